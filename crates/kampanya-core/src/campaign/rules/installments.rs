//! Installment counts and reward rates.

use rust_decimal::Decimal;

use super::numbers::parse_turkish_amount;
use super::patterns::{INSTALLMENT_COUNT, PERCENT};
use super::{ExtractionMatch, FieldExtractor};

const MAX_INSTALLMENTS: u32 = 48;

/// Installment count extractor ("+4 taksit", "9 aya varan taksit").
pub struct InstallmentExtractor;

impl InstallmentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Largest installment count mentioned.
    pub fn max_count(&self, text: &str) -> Option<u32> {
        self.extract_all(text).into_iter().map(|m| m.value).max()
    }
}

impl Default for InstallmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InstallmentExtractor {
    type Output = ExtractionMatch<u32>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INSTALLMENT_COUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let count: u32 = caps[1].parse().ok()?;
                (1..=MAX_INSTALLMENTS)
                    .contains(&count)
                    .then(|| ExtractionMatch::new(count, full.start(), full.end(), full.as_str()))
            })
            .collect()
    }
}

/// Reward rate extractor ("%10", "15%", "yüzde 7,5").
pub struct PercentageExtractor;

impl PercentageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PercentageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PercentageExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let hundred = Decimal::from(100);

        PERCENT
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let raw = caps.get(1).or(caps.get(2)).or(caps.get(3))?;
                let rate = parse_turkish_amount(raw.as_str())?;
                (rate > Decimal::ZERO && rate <= hundred)
                    .then(|| ExtractionMatch::new(rate, full.start(), full.end(), full.as_str()))
            })
            .collect()
    }
}
