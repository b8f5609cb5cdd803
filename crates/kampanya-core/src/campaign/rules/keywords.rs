//! Reward vocabulary and keyword pre-scan.

use super::installments::PercentageExtractor;
use super::numbers::NumericToken;
use super::{window_after, FieldExtractor};
use crate::models::campaign::RewardType;
use crate::models::config::{KampanyaConfig, SourceProfile};

const DISCOUNT_WORDS: &[&str] = &["indirim"];
const CASHBACK_WORDS: &[&str] = &[
    "nakit iade",
    "para iadesi",
    "geri odeme",
    "cashback",
    "iade",
    "nakit",
];
const FILLER_WORDS: &[&str] = &["degerinde", "tutarinda", "hediye", "ekstra", "ek"];

/// Lowercase and strip Turkish diacritics ("İşBankası" -> "isbankasi").
pub fn fold_turkish(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' | 'I' | 'ı' => out.push('i'),
            'Ş' | 'ş' => out.push('s'),
            'Ğ' | 'ğ' => out.push('g'),
            'Ü' | 'ü' => out.push('u'),
            'Ö' | 'ö' => out.push('o'),
            'Ç' | 'ç' => out.push('c'),
            '\u{0307}' => {}
            c => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Keyword signals found before running the strategy chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardSignals {
    /// "taksit" appears somewhere.
    pub installment: bool,
    /// "indirim" appears somewhere.
    pub discount: bool,
    /// A cashback word appears somewhere.
    pub cashback: bool,
    /// A loyalty currency is attached to an amount or a rate.
    pub points: bool,
    /// A non-zero rate appears somewhere ("%0 faiz" is not a reward).
    pub percentage: bool,
}

impl RewardSignals {
    /// Check if any monetary reward is mentioned.
    pub fn has_reward(&self) -> bool {
        self.discount || self.cashback || self.points || self.percentage
    }
}

/// Reward words, including the loyalty currencies of a source.
#[derive(Debug, Clone)]
pub struct RewardVocabulary {
    points: Vec<String>,
}

impl RewardVocabulary {
    /// Build the vocabulary for `source`, or for every known source when `None`.
    pub fn new(config: &KampanyaConfig, source: Option<&SourceProfile>) -> Self {
        let profiles: Vec<&SourceProfile> = match source {
            Some(profile) => vec![profile],
            None => config.profiles.iter().collect(),
        };

        let mut points: Vec<String> = config
            .extraction
            .points_currencies
            .iter()
            .chain(profiles.iter().flat_map(|p| p.currencies.iter()))
            .map(|w| fold_turkish(w.trim()))
            .filter(|w| !w.is_empty())
            .collect();

        points.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        points.dedup();

        Self { points }
    }

    /// Classify the words directly following an amount or a rate.
    pub fn classify(&self, following: &str) -> Option<RewardType> {
        let folded = fold_turkish(following);
        let rest = strip_currency(folded.trim_start());

        if let Some(kind) = self.word_at_start(rest) {
            return Some(kind);
        }

        // One filler word may sit in between: "50 TL değerinde puan"
        let filler = FILLER_WORDS
            .iter()
            .find(|w| starts_with_word(rest, w, true))?;
        self.word_at_start(rest[filler.len()..].trim_start())
    }

    /// Type of the earliest reward keyword in the text.
    pub fn first_keyword(&self, text: &str) -> Option<RewardType> {
        let folded = fold_turkish(text);
        let mut best: Option<(usize, RewardType)> = None;

        for (word, kind) in self.all_words() {
            if let Some(pos) = find_word(&folded, word) {
                if best.is_none_or(|(p, _)| pos < p) {
                    best = Some((pos, kind));
                }
            }
        }

        best.map(|(_, kind)| kind)
    }

    /// Check if the text names a loyalty currency anywhere.
    pub fn names_points_currency(&self, text: &str) -> bool {
        let folded = fold_turkish(text);
        self.points.iter().any(|w| find_word(&folded, w).is_some())
    }

    /// Pre-scan the numeric view for reward signals.
    pub fn signals(&self, view: &str, tokens: &[NumericToken]) -> RewardSignals {
        let folded = fold_turkish(view);

        let mut signals = RewardSignals {
            installment: folded.contains("taksit"),
            discount: DISCOUNT_WORDS.iter().any(|w| find_word(&folded, w).is_some()),
            cashback: CASHBACK_WORDS.iter().any(|w| find_word(&folded, w).is_some()),
            points: tokens
                .iter()
                .any(|t| self.classify(&t.following) == Some(RewardType::Points)),
            percentage: false,
        };

        for rate in PercentageExtractor::new().extract_all(view) {
            signals.percentage = true;
            if self.classify(window_after(view, rate.end(), 40)) == Some(RewardType::Points) {
                signals.points = true;
            }
        }

        signals
    }

    fn word_at_start(&self, rest: &str) -> Option<RewardType> {
        self.all_words()
            .find(|(word, _)| starts_with_word(rest, word, word.chars().count() <= 3))
            .map(|(_, kind)| kind)
    }

    fn all_words(&self) -> impl Iterator<Item = (&str, RewardType)> {
        self.points
            .iter()
            .map(|w| (w.as_str(), RewardType::Points))
            .chain(CASHBACK_WORDS.iter().map(|w| (*w, RewardType::Cashback)))
            .chain(DISCOUNT_WORDS.iter().map(|w| (*w, RewardType::Discount)))
    }
}

impl Default for RewardVocabulary {
    fn default() -> Self {
        Self::new(&KampanyaConfig::default(), None)
    }
}

/// Drop a leading currency unit and its case suffix ("tl'ye", "₺").
fn strip_currency(s: &str) -> &str {
    for unit in ["tl", "try", "₺"] {
        if let Some(rest) = s.strip_prefix(unit) {
            if rest.chars().next().is_some_and(|c| c.is_alphanumeric()) {
                continue;
            }
            let rest = match rest.strip_prefix('\'') {
                Some(suffixed) => suffixed.trim_start_matches(|c: char| c.is_alphabetic()),
                None => rest,
            };
            return rest.trim_start();
        }
    }
    s
}

fn starts_with_word(s: &str, word: &str, whole: bool) -> bool {
    match s.strip_prefix(word) {
        Some(rest) => !whole || !rest.chars().next().is_some_and(|c| c.is_alphanumeric()),
        None => false,
    }
}

/// Byte position of `word` in `haystack`, starting at a word boundary.
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    let whole = word.chars().count() <= 3;
    haystack.match_indices(word).map(|(pos, _)| pos).find(|&pos| {
        let left_ok = !haystack[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric());
        left_ok && starts_with_word(&haystack[pos..], word, whole)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_turkish() {
        assert_eq!(fold_turkish("İşBankası"), "isbankasi");
        assert_eq!(fold_turkish("ÇĞÖŞÜ çğöşü"), "cgosu cgosu");
        assert_eq!(fold_turkish("GERİ ÖDEME"), "geri odeme");
    }

    #[test]
    fn test_classify_following_words() {
        let vocab = RewardVocabulary::default();
        assert_eq!(vocab.classify(" TL puan kazanın"), Some(RewardType::Points));
        assert_eq!(vocab.classify(" TL'ye varan indirim"), None);
        assert_eq!(vocab.classify(" TL indirim"), Some(RewardType::Discount));
        assert_eq!(vocab.classify(" TL nakit iade"), Some(RewardType::Cashback));
        assert_eq!(vocab.classify(" TL değerinde chip-para"), Some(RewardType::Points));
        assert_eq!(vocab.classify(" Worldpuan"), Some(RewardType::Points));
        assert_eq!(vocab.classify(" TL ve üzeri"), None);
    }

    #[test]
    fn test_short_words_need_boundary() {
        let vocab = RewardVocabulary::default();
        assert_eq!(vocab.classify(" mil"), Some(RewardType::Points));
        assert_eq!(vocab.classify(" milyon"), None);
    }

    #[test]
    fn test_source_profile_narrows_vocabulary() {
        let config = KampanyaConfig::default();
        let akbank = RewardVocabulary::new(&config, config.profile("akbank"));
        assert!(akbank.names_points_currency("50 TL chip-para"));
        assert!(!akbank.names_points_currency("50 TL maxipuan"));

        let all = RewardVocabulary::new(&config, None);
        assert!(all.names_points_currency("50 TL maxipuan"));
    }

    #[test]
    fn test_first_keyword_is_earliest() {
        let vocab = RewardVocabulary::default();
        assert_eq!(
            vocab.first_keyword("Nakit iade ya da indirim"),
            Some(RewardType::Cashback)
        );
        assert_eq!(vocab.first_keyword("İndirim ve puan"), Some(RewardType::Discount));
        assert_eq!(vocab.first_keyword("taksit fırsatı"), None);
    }

    #[test]
    fn test_signals_ignore_bare_brand_names() {
        let vocab = RewardVocabulary::default();
        let signals = vocab.signals("Bonus kartlara 6 taksit", &[]);
        assert!(signals.installment);
        assert!(!signals.has_reward());
    }

    #[test]
    fn test_signals_ignore_zero_interest_rate() {
        let vocab = RewardVocabulary::default();
        let signals = vocab.signals("Peşin fiyatına %0 faizle 6 taksit", &[]);
        assert!(signals.installment);
        assert!(!signals.percentage);
        assert!(!signals.has_reward());

        let rewarded = vocab.signals("6 taksit ve %5 indirim", &[]);
        assert!(rewarded.percentage);
    }
}
