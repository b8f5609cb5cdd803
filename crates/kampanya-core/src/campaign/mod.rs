//! Campaign economics and validity extraction module.

mod engine;
pub mod rules;

pub use engine::CampaignEngine;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::campaign::Extraction;

/// Caller-supplied hints for a single extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionHints {
    /// Force (`Some(true)`) or forbid (`Some(false)`) the installment-only reading.
    pub installment_only: Option<bool>,

    /// Source profile name, e.g. "akbank".
    pub source: Option<String>,
}

impl ExtractionHints {
    /// Create hints that let the engine decide everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the installment-only hint.
    pub fn with_installment_only(mut self, installment_only: bool) -> Self {
        self.installment_only = Some(installment_only);
        self
    }

    /// Set the source profile.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Trait for campaign text extractors.
pub trait CampaignExtractor {
    /// Extract economics and validity from raw campaign text.
    ///
    /// Never fails: fields that cannot be determined are null and the result
    /// is marked partial.
    fn extract(
        &self,
        text: &str,
        reference_date: NaiveDate,
        hints: &ExtractionHints,
    ) -> Extraction;
}

lazy_static! {
    static ref DEFAULT_ENGINE: CampaignEngine = CampaignEngine::default();
}

/// Extract with the default configuration.
pub fn extract(text: &str, reference_date: NaiveDate, hints: &ExtractionHints) -> Extraction {
    DEFAULT_ENGINE.extract(text, reference_date, hints)
}
