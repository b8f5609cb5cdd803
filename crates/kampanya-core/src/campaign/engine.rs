//! Extraction engine: runs the rule modules and assembles the result.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::rules::dates::default_start;
use super::rules::rewards::spend_for_rate;
use super::rules::{
    fold_turkish, DateResolver, NumberScanner, ParticipationDetector, ResolvedEconomics,
    RewardResolver, RewardVocabulary, TextNormalizer,
};
use super::{CampaignExtractor, ExtractionHints};
use crate::models::campaign::{
    CampaignEconomics, Extraction, Participation, RewardType, ValidityWindow,
};
use crate::models::config::KampanyaConfig;

/// Vocabulary and participation detector for one source.
#[derive(Debug, Clone)]
struct SourceRules {
    vocab: RewardVocabulary,
    participation: ParticipationDetector,
}

/// Rule-based campaign extraction engine.
///
/// Immutable after construction; one engine can serve any number of threads.
#[derive(Debug, Clone)]
pub struct CampaignEngine {
    config: KampanyaConfig,
    normalizer: TextNormalizer,
    scanner: NumberScanner,
    dates: DateResolver,
    /// Rules spanning every known source.
    fallback: SourceRules,
    /// Rules per source, keyed by folded profile name.
    sources: HashMap<String, SourceRules>,
}

impl CampaignEngine {
    /// Create an engine from configuration.
    pub fn new(config: KampanyaConfig) -> Self {
        let fallback = SourceRules {
            vocab: RewardVocabulary::new(&config, None),
            participation: ParticipationDetector::new(
                &config.profiles.iter().collect::<Vec<_>>(),
            ),
        };

        let sources = config
            .profiles
            .iter()
            .map(|profile| {
                let rules = SourceRules {
                    vocab: RewardVocabulary::new(&config, Some(profile)),
                    participation: ParticipationDetector::new(&[profile]),
                };
                (fold_turkish(profile.name.trim()), rules)
            })
            .collect();

        Self {
            normalizer: TextNormalizer::new(&config.normalizer),
            scanner: NumberScanner::new(&config.extraction),
            dates: DateResolver::new(),
            fallback,
            sources,
            config,
        }
    }

    /// Extract economics and validity from raw campaign text.
    pub fn extract(
        &self,
        text: &str,
        reference_date: NaiveDate,
        hints: &ExtractionHints,
    ) -> Extraction {
        debug!("Extracting campaign text ({} bytes)", text.len());

        let normalized = self.normalizer.normalize(text);
        let tokens = self.scanner.scan(&normalized.numeric_view);
        debug!("Found {} numeric tokens", tokens.len());

        let rules = self.rules_for(hints.source.as_deref());
        let resolved = RewardResolver::new(&rules.vocab, &self.config.extraction).resolve(
            &normalized.numeric_view,
            &tokens,
            hints.installment_only,
        );
        let validity = self.dates.resolve(&normalized.text, reference_date);
        let participation = rules.participation.detect(&normalized.text);

        self.assemble(resolved, validity, participation, reference_date)
    }

    fn rules_for(&self, source: Option<&str>) -> &SourceRules {
        let Some(name) = source else {
            return &self.fallback;
        };

        match self.sources.get(&fold_turkish(name.trim())) {
            Some(rules) => rules,
            None => {
                warn!("Unknown source profile '{}', using all profiles", name);
                &self.fallback
            }
        }
    }

    /// Merge the partial results, repairing invariant violations.
    fn assemble(
        &self,
        resolved: ResolvedEconomics,
        mut validity: ValidityWindow,
        participation: Option<Participation>,
        reference_date: NaiveDate,
    ) -> Extraction {
        let mut issues = Vec::new();
        let mut economics = resolved.economics;

        if let Some(rate) = economics.reward_percentage {
            let typed = matches!(
                economics.reward_type,
                Some(RewardType::Discount | RewardType::Cashback)
            );
            if !typed || rate <= Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                issues.push(format!(
                    "reward_percentage {} dropped: not a discount or cashback rate",
                    rate
                ));
                economics.reward_percentage = None;
            }
        }

        if !resolved.min_spend_explicit {
            if let (Some(cap), Some(rate)) = (economics.reward_cap, economics.reward_percentage) {
                let derived = spend_for_rate(cap, rate);
                if economics.min_spend != derived {
                    issues.push(format!("min_spend recomputed from cap {} at {}%", cap, rate));
                    economics.min_spend = derived;
                }
            }
        }

        self.check_amount("min_spend", &mut economics.min_spend, &mut issues);
        self.check_amount("reward_amount", &mut economics.reward_amount, &mut issues);
        self.check_amount("reward_cap", &mut economics.reward_cap, &mut issues);

        if economics.installment_count == Some(0) {
            issues.push("installment_count 0 dropped".to_string());
            economics.installment_count = None;
        }

        if !validity.is_ordered() {
            repair_window(&mut validity, reference_date, &mut issues);
        }

        for issue in &issues {
            debug!("Repaired: {}", issue);
        }

        let economics = normalize_amounts(economics);
        let mut extraction = Extraction {
            reward_text: economics.reward_text(),
            economics,
            validity,
            partial: false,
            strategy: resolved.strategy,
            participation,
            issues,
        };
        extraction.partial =
            !extraction.issues.is_empty() || !extraction.missing_fields().is_empty();

        extraction
    }

    fn check_amount(&self, field: &str, value: &mut Option<Decimal>, issues: &mut Vec<String>) {
        let Some(amount) = *value else {
            return;
        };
        if amount <= Decimal::ZERO || !self.scanner.is_plausible(amount) {
            issues.push(format!("{} {} dropped: outside the plausible range", field, amount));
            *value = None;
        }
    }
}

impl Default for CampaignEngine {
    fn default() -> Self {
        Self::new(KampanyaConfig::default())
    }
}

impl CampaignExtractor for CampaignEngine {
    fn extract(
        &self,
        text: &str,
        reference_date: NaiveDate,
        hints: &ExtractionHints,
    ) -> Extraction {
        CampaignEngine::extract(self, text, reference_date, hints)
    }
}

/// Drop the inferred bound of an inverted window (both when neither was inferred).
fn repair_window(
    validity: &mut ValidityWindow,
    reference_date: NaiveDate,
    issues: &mut Vec<String>,
) {
    issues.push(format!(
        "validity window inverted: {:?} > {:?}",
        validity.start_date, validity.end_date
    ));

    match (validity.start_inferred, validity.end_inferred) {
        (false, true) => {
            validity.end_date = None;
            validity.end_inferred = false;
        }
        (true, _) => {
            validity.start_date = None;
            validity.start_inferred = false;
        }
        (false, false) => {
            *validity = ValidityWindow::default();
        }
    }

    if validity.start_date.is_none() {
        if let Some(end) = validity.end_date {
            validity.start_date = Some(default_start(reference_date, end));
            validity.start_inferred = true;
        }
    }
}

fn normalize_amounts(economics: CampaignEconomics) -> CampaignEconomics {
    CampaignEconomics {
        min_spend: economics.min_spend.map(|d| d.normalize()),
        reward_amount: economics.reward_amount.map(|d| d.normalize()),
        reward_percentage: economics.reward_percentage.map(|d| d.normalize()),
        reward_cap: economics.reward_cap.map(|d| d.normalize()),
        ..economics
    }
}
