//! Core library for Turkish bank-card campaign text.
//!
//! This crate provides:
//! - Text normalization (boilerplate removal, year masking)
//! - Turkish-locale amount scanning with plausibility filtering
//! - Validity window resolution with year inference
//! - The spend/reward strategy chain (percentage caps, tiers, cycles, ordinals)
//! - Participation detection (SMS keywords, mobile apps)

pub mod error;
pub mod models;
pub mod campaign;

pub use error::{KampanyaError, Result};
pub use models::campaign::{
    CampaignEconomics, Extraction, Participation, RewardStrategy, RewardType, ValidityWindow,
};
pub use models::config::{KampanyaConfig, SourceProfile};
pub use campaign::{extract, CampaignEngine, CampaignExtractor, ExtractionHints};
