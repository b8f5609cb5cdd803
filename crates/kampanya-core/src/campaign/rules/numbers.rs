//! Numeric token scanning for Turkish-formatted amounts.

use regex::Match;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::dates::month_number;
use super::keywords::fold_turkish;
use super::normalize::in_date_context;
use super::patterns::{NUMERIC_TOKEN, YEAR_TOKEN};
use super::{window_after, window_before, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// A candidate monetary amount found in the numeric view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericToken {
    /// Decoded value.
    pub value: Decimal,
    /// Byte span in the numeric view.
    pub span: (usize, usize),
    /// Matched text, e.g. "1.500".
    pub raw: String,
    /// Context before the token.
    pub preceding: String,
    /// Context after the token.
    pub following: String,
}

/// Scans text for plausible amounts.
#[derive(Debug, Clone)]
pub struct NumberScanner {
    min: Decimal,
    max: Decimal,
    context: usize,
}

impl NumberScanner {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min: Decimal::from(config.min_plausible_amount),
            max: Decimal::from(config.max_plausible_amount),
            context: config.context_window,
        }
    }

    /// Check if a value lies strictly inside the plausibility window.
    pub fn is_plausible(&self, value: Decimal) -> bool {
        self.min < value && value < self.max
    }

    /// Scan the numeric view, in text order.
    pub fn scan(&self, view: &str) -> Vec<NumericToken> {
        let mut tokens = Vec::new();

        for m in NUMERIC_TOKEN.find_iter(view) {
            let Some(value) = parse_turkish_amount(m.as_str()) else {
                continue;
            };
            if !self.is_plausible(value) {
                continue;
            }

            let preceding = window_before(view, m.start(), self.context);
            let following = window_after(view, m.end(), self.context);

            if is_date_part(preceding, following)
                || is_percentage(preceding, following)
                || is_day_of_month(following)
            {
                continue;
            }
            if is_year_shaped(m.as_str()) && in_date_context(view, m.start()) {
                continue;
            }

            tokens.push(NumericToken {
                value,
                span: (m.start(), m.end()),
                raw: m.as_str().to_string(),
                preceding: preceding.to_string(),
                following: following.to_string(),
            });
        }

        tokens
    }
}

impl Default for NumberScanner {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl FieldExtractor for NumberScanner {
    type Output = NumericToken;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.scan(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.scan(text)
    }
}

/// Find the token covering exactly the given match.
pub fn token_at<'a>(tokens: &'a [NumericToken], m: Match<'_>) -> Option<&'a NumericToken> {
    tokens.iter().find(|t| t.span == (m.start(), m.end()))
}

// "15.02.2026" or "15/02"
fn is_date_part(preceding: &str, following: &str) -> bool {
    let mut after = following.chars();
    let sep_then_digit = matches!(after.next(), Some('.' | '/'))
        && after.next().is_some_and(|c| c.is_ascii_digit());

    let mut before = preceding.chars().rev();
    let digit_then_sep = matches!(before.next(), Some('.' | '/'))
        && before.next().is_some_and(|c| c.is_ascii_digit());

    sep_then_digit || digit_then_sep
}

fn is_percentage(preceding: &str, following: &str) -> bool {
    let before = preceding.trim_end();
    before.ends_with('%')
        || fold_turkish(before).ends_with("yuzde")
        || following.trim_start().starts_with('%')
}

fn is_day_of_month(following: &str) -> bool {
    following
        .split_whitespace()
        .next()
        .map(|word| word.split('\'').next().unwrap_or(word))
        .and_then(month_number)
        .is_some()
}

fn is_year_shaped(raw: &str) -> bool {
    raw.len() == 4 && YEAR_TOKEN.is_match(raw)
}

/// Parse a Turkish-formatted amount (e.g., "1.500" or "12.500,50").
pub fn parse_turkish_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format amount in Turkish style (1.500 or 12.500,5).
pub fn format_turkish_amount(amount: Decimal) -> String {
    let amount = amount.normalize();
    let s = amount.abs().to_string();
    let (integer, fraction) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    match fraction {
        Some(f) => format!("{}{},{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
