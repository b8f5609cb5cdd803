//! Validity window resolution for Turkish campaign dates.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use tracing::debug;

use super::keywords::fold_turkish;
use super::patterns::{
    DATE_DAY_RANGE, DATE_FULL_RANGE, DATE_NUMERIC_OPEN_ENDED, DATE_NUMERIC_RANGE,
    DATE_OPEN_ENDED, DATE_SHARED_YEAR,
};
use crate::models::campaign::ValidityWindow;

const MONTHS: [&str; 12] = [
    "ocak", "subat", "mart", "nisan", "mayis", "haziran", "temmuz", "agustos", "eylul", "ekim",
    "kasim", "aralik",
];

/// Month number (1-12) for a Turkish month name.
pub(crate) fn month_number(word: &str) -> Option<u32> {
    let folded = fold_turkish(word);
    MONTHS
        .iter()
        .position(|m| *m == folded)
        .map(|i| i as u32 + 1)
}

/// Year for a month written without one: months before the reference month
/// belong to next year.
pub fn infer_year(month: u32, reference: NaiveDate) -> i32 {
    if month < reference.month() {
        reference.year() + 1
    } else {
        reference.year()
    }
}

#[derive(Debug, Clone, Copy)]
struct Bound {
    date: NaiveDate,
    inferred: bool,
}

type Layer = fn(&str, NaiveDate) -> Option<(Option<Bound>, Bound)>;

/// Resolves the validity window of a campaign.
#[derive(Debug, Clone, Default)]
pub struct DateResolver;

impl DateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the validity window; the first layer with a valid match wins.
    pub fn resolve(&self, text: &str, reference: NaiveDate) -> ValidityWindow {
        let layers: [(&str, Layer); 5] = [
            ("full range", full_range),
            ("shared year", shared_year),
            ("day range", day_range),
            ("numeric range", numeric_range),
            ("open-ended", open_ended),
        ];

        for (name, layer) in layers {
            if let Some((start, end)) = layer(text, reference) {
                debug!(
                    "Validity window from {} layer: {:?} - {}",
                    name,
                    start.map(|b| b.date),
                    end.date
                );
                return window(start, end, reference);
            }
        }

        ValidityWindow::default()
    }
}

fn window(start: Option<Bound>, end: Bound, reference: NaiveDate) -> ValidityWindow {
    let (start_date, start_inferred) = match start {
        Some(bound) => (bound.date, bound.inferred),
        None => (default_start(reference, end.date), true),
    };

    ValidityWindow {
        start_date: Some(start_date),
        end_date: Some(end.date),
        start_inferred,
        end_inferred: end.inferred,
    }
}

/// Start of a campaign whose text only states an end date.
pub fn default_start(reference: NaiveDate, end: NaiveDate) -> NaiveDate {
    if reference <= end { reference } else { end }
}

/// First candidate that `parse` accepts, searching again one character after
/// each rejected match start so a bogus match cannot hide an overlapping one.
fn first_valid<T>(
    re: &Regex,
    text: &str,
    parse: impl Fn(&Captures<'_>) -> Option<T>,
) -> Option<T> {
    let mut pos = 0;
    while let Some(caps) = re.captures_at(text, pos) {
        if let Some(value) = parse(&caps) {
            return Some(value);
        }
        let start = caps.get(0)?.start();
        pos = start + text[start..].chars().next()?.len_utf8();
    }
    None
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn year(caps: &Captures<'_>, group: usize) -> Option<i32> {
    caps.get(group)?.as_str().parse().ok()
}

fn month(caps: &Captures<'_>, group: usize) -> Option<u32> {
    month_number(caps.get(group)?.as_str())
}

fn bound(year: i32, month: u32, day: u32, inferred: bool) -> Option<Bound> {
    NaiveDate::from_ymd_opt(year, month, day).map(|date| Bound { date, inferred })
}

// 1 Şubat 2026 - 28 Şubat 2026
fn full_range(text: &str, _reference: NaiveDate) -> Option<(Option<Bound>, Bound)> {
    first_valid(&DATE_FULL_RANGE, text, |caps| {
        let start = bound(year(&caps, 3)?, month(&caps, 2)?, number(&caps, 1)?, false)?;
        let end = bound(year(&caps, 6)?, month(&caps, 5)?, number(&caps, 4)?, false)?;
        Some((Some(start), end))
    })
}

// 1 Şubat - 28 Şubat [2026]
fn shared_year(text: &str, reference: NaiveDate) -> Option<(Option<Bound>, Bound)> {
    first_valid(&DATE_SHARED_YEAR, text, |caps| {
        let start_month = month(&caps, 2)?;
        let end_month = month(&caps, 4)?;
        let (end_year, inferred) = match year(&caps, 5) {
            Some(y) => (y, false),
            None => (infer_year(end_month, reference), true),
        };

        let end = bound(end_year, end_month, number(&caps, 3)?, inferred)?;
        let mut start = bound(end_year, start_month, number(&caps, 1)?, inferred)?;
        if start.date > end.date {
            start = bound(end_year - 1, start_month, start.date.day(), true)?;
        }
        Some((Some(start), end))
    })
}

// 1-28 Şubat [2026]
fn day_range(text: &str, reference: NaiveDate) -> Option<(Option<Bound>, Bound)> {
    first_valid(&DATE_DAY_RANGE, text, |caps| {
        let month = month(&caps, 3)?;
        let (year, inferred) = match year(&caps, 4) {
            Some(y) => (y, false),
            None => (infer_year(month, reference), true),
        };

        let start = bound(year, month, number(&caps, 1)?, inferred)?;
        let end = bound(year, month, number(&caps, 2)?, inferred)?;
        Some((Some(start), end))
    })
}

// 01.02.2026 - 28.02.2026
fn numeric_range(text: &str, _reference: NaiveDate) -> Option<(Option<Bound>, Bound)> {
    first_valid(&DATE_NUMERIC_RANGE, text, |caps| {
        let start = bound(year(&caps, 3)?, number(&caps, 2)?, number(&caps, 1)?, false)?;
        let end = bound(year(&caps, 6)?, number(&caps, 5)?, number(&caps, 4)?, false)?;
        Some((Some(start), end))
    })
}

// 31 Mart'a kadar, 31.03.2026 tarihine kadar
fn open_ended(text: &str, reference: NaiveDate) -> Option<(Option<Bound>, Bound)> {
    let textual = first_valid(&DATE_OPEN_ENDED, text, |caps| {
        let month = month(&caps, 2)?;
        let (year, inferred) = match year(&caps, 3) {
            Some(y) => (y, false),
            None => (infer_year(month, reference), true),
        };
        bound(year, month, number(&caps, 1)?, inferred)
    });

    let end = textual.or_else(|| {
        first_valid(&DATE_NUMERIC_OPEN_ENDED, text, |caps| {
            bound(year(&caps, 3)?, number(&caps, 2)?, number(&caps, 1)?, false)
        })
    })?;

    Some((None, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_number_folds() {
        assert_eq!(month_number("Şubat"), Some(2));
        assert_eq!(month_number("AĞUSTOS"), Some(8));
        assert_eq!(month_number("aralık"), Some(12));
        assert_eq!(month_number("kampanya"), None);
    }

    #[test]
    fn test_full_range() {
        let window = DateResolver::new()
            .resolve("1 Ocak 2026 - 31 Ocak 2026 tarihleri arasında", date(2025, 12, 1));
        assert_eq!(window.start_date, Some(date(2026, 1, 1)));
        assert_eq!(window.end_date, Some(date(2026, 1, 31)));
        assert!(!window.start_inferred);
        assert!(!window.end_inferred);
    }

    #[test]
    fn test_shared_year() {
        let window = DateResolver::new().resolve("1 Şubat - 28 Şubat 2026", date(2026, 1, 10));
        assert_eq!(window.start_date, Some(date(2026, 2, 1)));
        assert_eq!(window.end_date, Some(date(2026, 2, 28)));
        assert!(!window.start_inferred);
    }

    #[test]
    fn test_shared_year_rolls_start_back() {
        let window = DateResolver::new()
            .resolve("15 Aralık ile 15 Ocak 2027 arasında", date(2026, 12, 1));
        assert_eq!(window.start_date, Some(date(2026, 12, 15)));
        assert_eq!(window.end_date, Some(date(2027, 1, 15)));
        assert!(window.start_inferred);
        assert!(!window.end_inferred);
    }

    #[test]
    fn test_day_range_infers_next_year() {
        let window = DateResolver::new().resolve("1-28 Şubat", date(2026, 3, 1));
        assert_eq!(window.start_date, Some(date(2027, 2, 1)));
        assert_eq!(window.end_date, Some(date(2027, 2, 28)));
        assert!(window.start_inferred);
        assert!(window.end_inferred);
    }

    #[test]
    fn test_numeric_range() {
        let window = DateResolver::new().resolve("01.02.2026 - 28.02.2026", date(2026, 1, 1));
        assert_eq!(window.start_date, Some(date(2026, 2, 1)));
        assert_eq!(window.end_date, Some(date(2026, 2, 28)));
    }

    #[test]
    fn test_open_ended_defaults_start_to_reference() {
        let window = DateResolver::new().resolve("31 Mart'a kadar geçerlidir", date(2026, 3, 10));
        assert_eq!(window.start_date, Some(date(2026, 3, 10)));
        assert_eq!(window.end_date, Some(date(2026, 3, 31)));
        assert!(window.start_inferred);
        assert!(window.end_inferred);
    }

    #[test]
    fn test_open_ended_in_the_past() {
        let window = DateResolver::new().resolve("31.01.2026 tarihine kadar", date(2026, 3, 10));
        assert_eq!(window.start_date, Some(date(2026, 1, 31)));
        assert_eq!(window.end_date, Some(date(2026, 1, 31)));
        assert!(!window.end_inferred);
    }

    #[test]
    fn test_range_after_count_word() {
        let resolver = DateResolver::new();
        let expected = (Some(date(2026, 2, 1)), Some(date(2026, 2, 28)));

        for text in [
            "Elektronik alışverişlerine +3 Taksit 1 Şubat - 28 Şubat 2026 tarihleri arasında",
            "Market harcamalarına 50 TL 1 Şubat - 28 Şubat 2026",
        ] {
            let window = resolver.resolve(text, date(2026, 1, 10));
            assert_eq!((window.start_date, window.end_date), expected, "{}", text);
        }
    }

    #[test]
    fn test_rejected_candidate_does_not_hide_next() {
        // "30 Şubat 1 Mart" is tried first and rejected as a calendar date
        let window =
            DateResolver::new().resolve("30 Şubat 1 Mart - 31 Mart 2026", date(2026, 1, 1));
        assert_eq!(window.start_date, Some(date(2026, 3, 1)));
        assert_eq!(window.end_date, Some(date(2026, 3, 31)));
    }

    #[test]
    fn test_default_start() {
        let end = date(2026, 3, 31);
        assert_eq!(default_start(date(2026, 1, 10), end), date(2026, 1, 10));
        assert_eq!(default_start(end, end), end);
        assert_eq!(default_start(date(2026, 5, 1), end), end);
    }

    #[test]
    fn test_invalid_dates_do_not_match() {
        let resolver = DateResolver::new();
        assert_eq!(
            resolver.resolve("31 Şubat 2026'ya kadar", date(2026, 1, 1)),
            ValidityWindow::default()
        );
        assert_eq!(
            resolver.resolve("Kampanya detayları", date(2026, 1, 1)),
            ValidityWindow::default()
        );
    }
}
