//! Campaign economics and validity models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::campaign::rules::numbers::format_turkish_amount;

/// Kind of reward a campaign pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    /// Money back to the card statement (iade, nakit iade, cashback).
    Cashback,
    /// Loyalty currency (puan, Bonus, chip-para, Worldpuan, ...).
    Points,
    /// Price reduction at the point of sale (indirim).
    Discount,
    /// Extra or deferred installments with no monetary reward.
    InstallmentOnly,
}

impl RewardType {
    /// Turkish label used in reward summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RewardType::Cashback => "İade",
            RewardType::Points => "Puan",
            RewardType::Discount => "İndirim",
            RewardType::InstallmentOnly => "Taksit",
        }
    }
}

/// Which step of the spend/reward chain produced the economics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardStrategy {
    InstallmentOnly,
    PercentageCap,
    Tiered,
    Recurring,
    OrdinalStep,
    PercentageOnly,
    SingleThreshold,
}

/// Spend and reward figures extracted from a campaign text.
///
/// Every field is nullable; a `None` means the engine could not determine it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignEconomics {
    /// Minimum single or cumulative spend required to qualify.
    pub min_spend: Option<Decimal>,

    /// Reward value in currency units (loyalty currencies count 1:1).
    pub reward_amount: Option<Decimal>,

    /// Reward kind.
    pub reward_type: Option<RewardType>,

    /// Reward rate, only for percentage-based campaigns.
    pub reward_percentage: Option<Decimal>,

    /// Maximum payable reward over the whole campaign.
    pub reward_cap: Option<Decimal>,

    /// Installment count, only for installment-only campaigns.
    pub installment_count: Option<u32>,
}

impl CampaignEconomics {
    /// Check if nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.min_spend.is_none()
            && self.reward_amount.is_none()
            && self.reward_type.is_none()
            && self.reward_percentage.is_none()
            && self.reward_cap.is_none()
            && self.installment_count.is_none()
    }

    /// Short reward label, e.g. "%10 (max 300 TL)", "150 TL Puan", "+4 Taksit".
    pub fn reward_text(&self) -> Option<String> {
        if self.reward_type == Some(RewardType::InstallmentOnly) {
            return self.installment_count.map(|n| format!("+{} Taksit", n));
        }

        if let Some(rate) = self.reward_percentage {
            let rate = format_turkish_amount(rate);
            return Some(match (self.reward_cap, self.reward_type) {
                (Some(cap), _) => format!("%{} (max {} TL)", rate, format_turkish_amount(cap)),
                (None, Some(kind)) => format!("%{} {}", rate, kind.label()),
                (None, None) => format!("%{}", rate),
            });
        }

        let amount = self.reward_amount.or(self.reward_cap)?;
        let amount = format_turkish_amount(amount);
        Some(match self.reward_type {
            Some(kind) => format!("{} TL {}", amount, kind.label()),
            None => format!("{} TL", amount),
        })
    }
}

/// Campaign validity window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// First day the campaign is valid.
    pub start_date: Option<NaiveDate>,

    /// Last day the campaign is valid.
    pub end_date: Option<NaiveDate>,

    /// Start was derived (year inferred or defaulted) rather than read.
    pub start_inferred: bool,

    /// End was derived (year inferred) rather than read.
    pub end_inferred: bool,
}

impl ValidityWindow {
    /// Check if the window is ordered (or open on either side).
    pub fn is_ordered(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

/// How a card holder joins the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Participation {
    /// Send `keyword` by SMS to `number`.
    Sms { keyword: String, number: String },
    /// Join through a mobile app.
    App { name: String },
    /// Text states that no action is needed.
    Automatic,
}

/// Result of a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Spend and reward figures.
    pub economics: CampaignEconomics,

    /// Validity window.
    pub validity: ValidityWindow,

    /// At least one applicable field is missing or was nulled.
    pub partial: bool,

    /// Chain step that produced the economics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<RewardStrategy>,

    /// Participation method, when stated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participation: Option<Participation>,

    /// Short reward label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_text: Option<String>,

    /// Notes on fields that were dropped while assembling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl Extraction {
    /// Names of applicable fields that are still null.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let economics = &self.economics;
        let installment_only = economics.reward_type == Some(RewardType::InstallmentOnly);
        let mut missing = Vec::new();

        if economics.reward_type.is_none() {
            missing.push("reward_type");
        }
        if installment_only {
            if economics.installment_count.is_none() {
                missing.push("installment_count");
            }
        } else {
            if economics.min_spend.is_none() {
                missing.push("min_spend");
            }
            if economics.reward_amount.is_none() {
                missing.push("reward_amount");
            }
        }
        if self.validity.start_date.is_none() {
            missing.push("start_date");
        }
        if self.validity.end_date.is_none() {
            missing.push("end_date");
        }

        missing
    }
}
