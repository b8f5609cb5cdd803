//! Spend/reward resolution: an ordered chain of campaign structures.
//!
//! The first structurally complete match wins:
//! 0. pure installment offers
//! 1. percentage with an explicit cap
//! 2. tiered spend/reward pairs
//! 3. recurring rewards ("her 1.000 TL harcamaya 50 TL")
//! 4. ordinal step rewards ("3. harcamaya")
//! 5. percentage without a cap
//! 6. single threshold fallback

use rust_decimal::Decimal;
use tracing::debug;

use super::installments::{InstallmentExtractor, PercentageExtractor};
use super::keywords::{fold_turkish, RewardVocabulary};
use super::numbers::{token_at, NumericToken};
use super::patterns::{
    AT_LEAST, CAP_PREFIX, CAP_SUFFIX, ORDINAL_NUMERIC, ORDINAL_WORD, RECURRING, THRESHOLD,
    THRESHOLD_AHEAD, TIER_PAIR,
};
use super::{window_after, FieldExtractor};
use crate::models::campaign::{CampaignEconomics, RewardStrategy, RewardType};
use crate::models::config::ExtractionConfig;

/// Output of the strategy chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEconomics {
    /// Extracted figures.
    pub economics: CampaignEconomics,
    /// Chain step that matched.
    pub strategy: Option<RewardStrategy>,
    /// `min_spend` was read from the text rather than derived.
    pub min_spend_explicit: bool,
}

impl ResolvedEconomics {
    fn matched(economics: CampaignEconomics, strategy: RewardStrategy, explicit: bool) -> Self {
        Self {
            economics,
            strategy: Some(strategy),
            min_spend_explicit: explicit,
        }
    }
}

/// Amounts with a known role, shared by every step.
struct Facts<'t> {
    view: &'t str,
    tokens: &'t [NumericToken],
    /// Entry thresholds, in text order.
    thresholds: Vec<&'t NumericToken>,
    /// Reward caps, in text order.
    caps: Vec<&'t NumericToken>,
    /// Amounts directly followed by a reward word, in text order.
    rewards: Vec<(&'t NumericToken, RewardType)>,
}

impl Facts<'_> {
    fn is_threshold(&self, token: &NumericToken) -> bool {
        self.thresholds.iter().any(|t| t.span == token.span)
    }

    fn min_threshold(&self) -> Option<Decimal> {
        self.thresholds.iter().map(|t| t.value).min()
    }

    fn max_threshold(&self) -> Option<Decimal> {
        self.thresholds.iter().map(|t| t.value).max()
    }

    /// First cap outside the byte range `[start, end)`.
    fn cap_outside(&self, start: usize, end: usize) -> Option<Decimal> {
        self.caps
            .iter()
            .find(|c| c.span.1 <= start || c.span.0 >= end)
            .map(|c| c.value)
    }
}

/// Runs the spend/reward strategy chain over the numeric view.
pub struct RewardResolver<'a> {
    vocab: &'a RewardVocabulary,
    config: &'a ExtractionConfig,
}

impl<'a> RewardResolver<'a> {
    pub fn new(vocab: &'a RewardVocabulary, config: &'a ExtractionConfig) -> Self {
        Self { vocab, config }
    }

    /// Resolve economics from the numeric view and its tokens.
    ///
    /// `installment_only` forces (`Some(true)`) or forbids (`Some(false)`) the
    /// installment-only reading; `None` lets keywords decide.
    pub fn resolve(
        &self,
        view: &str,
        tokens: &[NumericToken],
        installment_only: Option<bool>,
    ) -> ResolvedEconomics {
        let facts = self.collect_facts(view, tokens);

        let resolved = self
            .installment_guard(&facts, installment_only)
            .or_else(|| self.percentage_with_cap(&facts))
            .or_else(|| self.tiered(&facts))
            .or_else(|| self.recurring(&facts))
            .or_else(|| self.ordinal_step(&facts))
            .or_else(|| self.percentage_only(&facts))
            .or_else(|| self.single_threshold(&facts));

        match resolved {
            Some(resolved) => {
                debug!("Reward strategy {:?}: {:?}", resolved.strategy, resolved.economics);
                resolved
            }
            None => {
                debug!("No reward strategy matched");
                ResolvedEconomics::default()
            }
        }
    }

    fn collect_facts<'t>(&self, view: &'t str, tokens: &'t [NumericToken]) -> Facts<'t> {
        let mut thresholds: Vec<&NumericToken> = THRESHOLD
            .captures_iter(view)
            .chain(AT_LEAST.captures_iter(view))
            .filter_map(|caps| token_at(tokens, caps.get(1)?))
            .collect();
        thresholds.sort_by_key(|t| t.span);
        thresholds.dedup_by_key(|t| t.span);

        let mut caps: Vec<&NumericToken> = CAP_PREFIX
            .captures_iter(view)
            .filter(|caps| {
                caps.get(0)
                    .is_some_and(|m| !THRESHOLD_AHEAD.is_match(&view[m.end()..]))
            })
            .chain(CAP_SUFFIX.captures_iter(view))
            .filter_map(|caps| token_at(tokens, caps.get(1)?))
            .collect();
        caps.sort_by_key(|t| t.span);
        caps.dedup_by_key(|t| t.span);

        let rewards = tokens
            .iter()
            .filter(|t| !thresholds.iter().any(|th| th.span == t.span))
            .filter_map(|t| self.vocab.classify(&t.following).map(|kind| (t, kind)))
            .collect();

        Facts {
            view,
            tokens,
            thresholds,
            caps,
            rewards,
        }
    }

    fn reward_type_after(&self, token: &NumericToken, view: &str) -> Option<RewardType> {
        self.vocab
            .classify(&token.following)
            .or_else(|| self.vocab.first_keyword(view))
    }

    // Step 0
    fn installment_guard(
        &self,
        facts: &Facts<'_>,
        hint: Option<bool>,
    ) -> Option<ResolvedEconomics> {
        let triggered = match hint {
            Some(forced) => forced,
            None => {
                let signals = self.vocab.signals(facts.view, facts.tokens);
                signals.installment && !signals.has_reward()
            }
        };
        if !triggered {
            return None;
        }

        let min_spend = facts.thresholds.first().map(|t| t.value);
        let economics = CampaignEconomics {
            min_spend,
            reward_type: Some(RewardType::InstallmentOnly),
            installment_count: InstallmentExtractor::new().max_count(facts.view),
            ..Default::default()
        };
        Some(ResolvedEconomics::matched(
            economics,
            RewardStrategy::InstallmentOnly,
            min_spend.is_some(),
        ))
    }

    // Step 1
    fn percentage_with_cap(&self, facts: &Facts<'_>) -> Option<ResolvedEconomics> {
        let rate = PercentageExtractor::new().extract(facts.view)?;
        let cap = facts.caps.first()?.value;

        let explicit = facts.thresholds.first().map(|t| t.value);
        let min_spend = explicit.or_else(|| spend_for_rate(cap, rate.value));

        let following = window_after(facts.view, rate.end(), self.config.context_window);
        let cashback = matches!(
            self.vocab.classify(following),
            Some(RewardType::Cashback | RewardType::Points)
        ) || self.vocab.names_points_currency(facts.view);

        let economics = CampaignEconomics {
            min_spend,
            reward_amount: Some(cap),
            reward_type: Some(if cashback { RewardType::Cashback } else { RewardType::Discount }),
            reward_percentage: Some(rate.value),
            reward_cap: Some(cap),
            installment_count: None,
        };
        Some(ResolvedEconomics::matched(
            economics,
            RewardStrategy::PercentageCap,
            explicit.is_some(),
        ))
    }

    // Step 2
    fn tiered(&self, facts: &Facts<'_>) -> Option<ResolvedEconomics> {
        let view = facts.view;
        let mut pairs: Vec<(&NumericToken, &NumericToken)> = Vec::new();
        let mut span = (usize::MAX, 0);
        let mut pos = 0;

        while let Some(caps) = TIER_PAIR.captures_at(view, pos) {
            let (Some(full), Some(spend_m), Some(reward_m)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };

            let reward = token_at(facts.tokens, reward_m);
            // The "reward" is the next tier's spend
            if reward.is_some_and(|r| facts.is_threshold(r)) {
                pos = reward_m.start();
                continue;
            }
            if let (Some(spend), Some(reward)) = (token_at(facts.tokens, spend_m), reward) {
                pairs.push((spend, reward));
                span = (span.0.min(full.start()), span.1.max(full.end()));
            }
            pos = full.end();
        }

        if pairs.len() < 2 {
            return None;
        }

        let mut winner = pairs[0];
        for pair in &pairs[1..] {
            if pair.1.value > winner.1.value {
                winner = *pair;
            }
        }
        let (spend, reward) = winner;

        let (min_spend, total) = match facts.cap_outside(span.0, span.1) {
            Some(cap) if cap != reward.value => (scale(spend.value, cap, reward.value), cap),
            _ => (Some(spend.value), reward.value),
        };

        let economics = CampaignEconomics {
            min_spend,
            reward_amount: Some(total),
            reward_type: self.reward_type_after(reward, view),
            reward_cap: Some(total),
            ..Default::default()
        };
        Some(ResolvedEconomics::matched(economics, RewardStrategy::Tiered, false))
    }

    // Step 3
    fn recurring(&self, facts: &Facts<'_>) -> Option<ResolvedEconomics> {
        let (full, unit_spend, unit_reward) = RECURRING.captures_iter(facts.view).find_map(|caps| {
            let full = caps.get(0)?;
            let spend = token_at(facts.tokens, caps.get(1)?)?;
            let reward = token_at(facts.tokens, caps.get(2)?)?;
            Some(((full.start(), full.end()), spend, reward))
        })?;

        let reward_type = self.reward_type_after(unit_reward, facts.view);
        let economics = match facts.cap_outside(full.0, full.1) {
            Some(cap) => {
                let cycles = cap.checked_div(unit_reward.value)?.ceil();
                CampaignEconomics {
                    min_spend: cycles.checked_mul(unit_spend.value),
                    reward_amount: Some(cap),
                    reward_type,
                    reward_cap: Some(cap),
                    ..Default::default()
                }
            }
            None => CampaignEconomics {
                min_spend: Some(unit_spend.value),
                reward_amount: Some(unit_reward.value),
                reward_type,
                ..Default::default()
            },
        };
        Some(ResolvedEconomics::matched(economics, RewardStrategy::Recurring, false))
    }

    // Step 4
    fn ordinal_step(&self, facts: &Facts<'_>) -> Option<ResolvedEconomics> {
        let from_words = ORDINAL_WORD
            .captures_iter(facts.view)
            .filter_map(|caps| ordinal_value(&caps[1]));
        let from_numbers = ORDINAL_NUMERIC
            .captures_iter(facts.view)
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .filter(|n| (1..=10).contains(n));
        let steps = from_words.chain(from_numbers).max()?;

        let threshold = facts.thresholds.first()?;
        let (reward, kind) = facts.rewards.first()?;

        let economics = CampaignEconomics {
            min_spend: threshold.value.checked_mul(Decimal::from(steps)),
            reward_amount: Some(reward.value),
            reward_type: Some(*kind),
            ..Default::default()
        };
        Some(ResolvedEconomics::matched(economics, RewardStrategy::OrdinalStep, false))
    }

    // Step 5
    fn percentage_only(&self, facts: &Facts<'_>) -> Option<ResolvedEconomics> {
        let (rate, kind) = PercentageExtractor::new()
            .extract_all(facts.view)
            .into_iter()
            .find_map(|rate| {
                let following = window_after(facts.view, rate.end(), self.config.context_window);
                let kind = match self.vocab.classify(following)? {
                    RewardType::Points => RewardType::Cashback,
                    kind => kind,
                };
                Some((rate.value, kind))
            })?;

        let min_spend = facts.min_threshold();
        let economics = CampaignEconomics {
            min_spend,
            reward_type: Some(kind),
            reward_percentage: Some(rate),
            ..Default::default()
        };
        Some(ResolvedEconomics::matched(
            economics,
            RewardStrategy::PercentageOnly,
            min_spend.is_some(),
        ))
    }

    // Step 6
    fn single_threshold(&self, facts: &Facts<'_>) -> Option<ResolvedEconomics> {
        if facts.thresholds.is_empty() {
            return None;
        }

        let best = facts
            .rewards
            .iter()
            .fold(None::<&(&NumericToken, RewardType)>, |best, hit| match best {
                Some(b) if b.0.value >= hit.0.value => Some(b),
                _ => Some(hit),
            });

        let large = Decimal::from(self.config.large_reward_threshold);
        let min_spend = match best {
            Some((reward, _)) if reward.value > large => facts.max_threshold(),
            _ => facts.min_threshold(),
        };
        let reward_type = match best {
            Some((_, kind)) => Some(*kind),
            None => self.vocab.first_keyword(facts.view),
        };

        let economics = CampaignEconomics {
            min_spend,
            reward_amount: best.map(|(reward, _)| reward.value),
            reward_type,
            ..Default::default()
        };
        Some(ResolvedEconomics::matched(economics, RewardStrategy::SingleThreshold, true))
    }
}

/// Spend that earns `cap` at `rate` percent, truncated to whole currency units.
pub fn spend_for_rate(cap: Decimal, rate: Decimal) -> Option<Decimal> {
    cap.checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(rate)
        .map(|spend| spend.trunc())
}

fn scale(spend: Decimal, cap: Decimal, reward: Decimal) -> Option<Decimal> {
    spend.checked_mul(cap)?.checked_div(reward).map(|s| s.trunc())
}

fn ordinal_value(word: &str) -> Option<u32> {
    let n = match fold_turkish(word).as_str() {
        "birinci" | "ilk" => 1,
        "ikinci" => 2,
        "ucuncu" => 3,
        "dorduncu" => 4,
        "besinci" => 5,
        "altinci" => 6,
        "yedinci" => 7,
        "sekizinci" => 8,
        "dokuzuncu" => 9,
        "onuncu" => 10,
        _ => return None,
    };
    Some(n)
}
