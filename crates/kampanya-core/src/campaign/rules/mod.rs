//! Rule-based field extractors for Turkish campaign text.

pub mod normalize;
pub mod numbers;
pub mod dates;
pub mod keywords;
pub mod installments;
pub mod rewards;
pub mod participation;
pub mod patterns;

pub use normalize::{NormalizedText, TextNormalizer};
pub use numbers::{format_turkish_amount, parse_turkish_amount, NumberScanner, NumericToken};
pub use dates::DateResolver;
pub use keywords::{fold_turkish, RewardSignals, RewardVocabulary};
pub use installments::{InstallmentExtractor, PercentageExtractor};
pub use rewards::{RewardResolver, ResolvedEconomics};
pub use participation::ParticipationDetector;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in the source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.position.0
    }

    pub fn end(&self) -> usize {
        self.position.1
    }
}

/// Up to `chars` characters of `text` ending at byte `pos`.
pub(crate) fn window_before(text: &str, pos: usize, chars: usize) -> &str {
    let head = &text[..pos];
    if chars == 0 {
        return "";
    }
    let start = head
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[start..]
}

/// Up to `chars` characters of `text` starting at byte `pos`.
pub(crate) fn window_after(text: &str, pos: usize, chars: usize) -> &str {
    let tail = &text[pos..];
    let end = tail
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    &tail[..end]
}
