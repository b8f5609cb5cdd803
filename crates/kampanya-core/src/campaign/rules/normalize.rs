//! Text normalization: character cleanup, boilerplate removal, year masking.

use tracing::trace;

use super::dates::month_number;
use super::keywords::fold_turkish;
use super::patterns::{DATE_PREFIX, YEAR_TOKEN};
use super::{window_after, window_before};
use crate::models::config::NormalizerConfig;

/// Normalized campaign text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Cleaned text with boilerplate sentences removed.
    pub text: String,
    /// Same text with non-date year tokens replaced by `####`.
    /// Always the same byte length as `text`.
    pub numeric_view: String,
}

/// Cleans raw campaign text before extraction.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    phrases: Vec<String>,
}

impl TextNormalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        let phrases = config
            .boilerplate_phrases
            .iter()
            .map(|p| fold_turkish(p.trim()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Normalize raw text into a clean text and its numeric view.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let cleaned = clean_chars(raw);

        let mut kept: Vec<String> = Vec::new();
        for sentence in split_sentences(&cleaned) {
            let collapsed = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                continue;
            }
            if self.is_boilerplate(&collapsed) {
                trace!("Dropping boilerplate sentence: {}", collapsed);
                continue;
            }
            kept.push(collapsed);
        }

        let text = kept.join(" ");
        let numeric_view = mask_years(&text);

        NormalizedText { text, numeric_view }
    }

    fn is_boilerplate(&self, sentence: &str) -> bool {
        let folded = fold_turkish(sentence);
        self.phrases.iter().any(|p| folded.contains(p.as_str()))
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

/// Unify character variants the patterns do not expect.
fn clean_chars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' | '\r' => out.push('\n'),
            '\u{0307}' => {}
            'İ' => out.push('I'),
            '\u{00a0}' | '\u{202f}' => out.push(' '),
            '–' | '—' | '‒' | '−' => out.push('-'),
            '’' | '‘' | '`' | '´' => out.push('\''),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Split on sentence terminators and newlines.
fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        let boundary = match c {
            '\n' => true,
            '.' | '!' | '?' => ends_sentence(&chars, i),
            _ => false,
        };
        if boundary {
            let end = pos + c.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

fn ends_sentence(chars: &[(usize, char)], i: usize) -> bool {
    match chars.get(i + 1) {
        None => return true,
        Some(&(_, next)) if !next.is_whitespace() => return false,
        _ => {}
    }

    // "1. harcama" is an ordinal, "2026. Detaylar" ends a sentence
    let after_digit = i > 0 && chars[i - 1].1.is_ascii_digit();
    if chars[i].1 == '.' && after_digit {
        return chars[i + 1..]
            .iter()
            .map(|&(_, c)| c)
            .find(|c| !c.is_whitespace())
            .is_none_or(|c| c.is_uppercase());
    }

    true
}

/// Check whether the token at `start` is preceded by a month name or a `D.M.` prefix.
pub(crate) fn in_date_context(text: &str, start: usize) -> bool {
    let before = window_before(text, start, 24);
    match DATE_PREFIX.captures(before) {
        Some(caps) => match caps.get(1) {
            Some(word) => month_number(word.as_str()).is_some(),
            None => true,
        },
        None => false,
    }
}

fn followed_by_currency(text: &str, end: usize) -> bool {
    let after = window_after(text, end, 5).trim_start().to_uppercase();
    after.starts_with("TL") || after.starts_with("TRY") || after.starts_with('₺')
}

fn mask_years(text: &str) -> String {
    let mut view = String::with_capacity(text.len());
    let mut last = 0;

    for m in YEAR_TOKEN.find_iter(text) {
        if in_date_context(text, m.start()) || followed_by_currency(text, m.end()) {
            continue;
        }
        view.push_str(&text[last..m.start()]);
        view.push_str("####");
        last = m.end();
    }
    view.push_str(&text[last..]);

    view
}
