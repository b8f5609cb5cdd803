//! Configuration structures for the extraction engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::campaign::rules::keywords::fold_turkish;
use crate::error::{KampanyaError, Result};

/// Main configuration for the kampanya engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KampanyaConfig {
    /// Text normalization configuration.
    pub normalizer: NormalizerConfig,

    /// Spend/reward extraction configuration.
    pub extraction: ExtractionConfig,

    /// Per-bank vocabularies.
    pub profiles: Vec<SourceProfile>,
}

impl Default for KampanyaConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            extraction: ExtractionConfig::default(),
            profiles: SourceProfile::builtin(),
        }
    }
}

/// Text normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Phrases marking a sentence as legal boilerplate (case-insensitive).
    pub boilerplate_phrases: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            boilerplate_phrases: [
                "yasal mevzuat",
                "taksitlendirme süresi bireysel",
                "operatörlerin kendi tarifeleri",
                "kampanyayı durdurma",
                "iptal edilen işlemlerde",
                "kullanılmayan puanlar geri alınacaktır",
                "kampanya koşullarına uygun olmayan işlemler",
                "harcama itirazı durumunda",
                "taksit kısıtı bulunan ürün grupları",
                "ödüller nakde çevrilemez",
                "değişiklik yapma hakkını saklı tutar",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Spend/reward extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Amounts must be strictly greater than this to count as spend or reward.
    pub min_plausible_amount: u64,

    /// Amounts must be strictly less than this to count as spend or reward.
    pub max_plausible_amount: u64,

    /// Above this detected reward, the single-threshold fallback picks the
    /// largest threshold instead of the smallest.
    pub large_reward_threshold: u64,

    /// Characters of context kept on each side of a numeric token.
    pub context_window: usize,

    /// Loyalty-currency names shared by all sources.
    pub points_currencies: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_plausible_amount: 10,
            max_plausible_amount: 5_000_000,
            large_reward_threshold: 500,
            context_window: 40,
            points_currencies: ["puan", "bonus", "chip-para", "chippara", "mil"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Vocabulary of a single bank or card program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceProfile {
    /// Profile key, e.g. "akbank".
    pub name: String,

    /// Loyalty-currency names, e.g. "chip-para".
    pub currencies: Vec<String>,

    /// SMS short numbers used for participation.
    pub sms_numbers: Vec<String>,

    /// Mobile apps used for participation.
    pub apps: Vec<String>,
}

impl SourceProfile {
    fn new(name: &str, currencies: &[&str], sms_numbers: &[&str], apps: &[&str]) -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            name: name.to_string(),
            currencies: owned(currencies),
            sms_numbers: owned(sms_numbers),
            apps: owned(apps),
        }
    }

    /// Built-in profiles for the banks the scrapers cover.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new(
                "akbank",
                &["chip-para", "mil puan", "mil"],
                &["4566"],
                &["Jüzdan", "Akbank Mobil"],
            ),
            Self::new(
                "garanti",
                &["bonus", "mil"],
                &["3340"],
                &["BonusFlaş", "Garanti BBVA Mobil"],
            ),
            Self::new(
                "isbankasi",
                &["maxipuan", "maximil"],
                &["4402"],
                &["Maximum Mobil", "İşCep", "Pazarama"],
            ),
            Self::new(
                "yapikredi",
                &["worldpuan"],
                &["4454"],
                &["World Mobil", "Yapı Kredi Mobil"],
            ),
            Self::new(
                "vakifbank",
                &["worldpuan"],
                &["6635"],
                &["Cepte Kazan", "VakıfBank Mobil"],
            ),
            Self::new("ziraat", &["bankkart lira"], &["4757"], &["Bankkart Mobil"]),
            Self::new("halkbank", &["parafpara"], &[], &["Paraf Mobil", "Halkbank Mobil"]),
            Self::new("denizbank", &["bonus"], &[], &["MobilDeniz"]),
            Self::new("qnb", &["parapuan"], &[], &["QNB Mobil"]),
        ]
    }
}

impl KampanyaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if extraction.min_plausible_amount >= extraction.max_plausible_amount {
            return Err(KampanyaError::Config(format!(
                "plausibility window is empty: [{}, {}]",
                extraction.min_plausible_amount, extraction.max_plausible_amount
            )));
        }
        if let Some(profile) = self.profiles.iter().find(|p| p.name.trim().is_empty()) {
            return Err(KampanyaError::Config(format!(
                "source profile without a name (currencies: {:?})",
                profile.currencies
            )));
        }
        Ok(())
    }

    /// Look up a source profile by name, ignoring case and Turkish diacritics.
    pub fn profile(&self, name: &str) -> Option<&SourceProfile> {
        let key = fold_turkish(name.trim());
        self.profiles.iter().find(|p| fold_turkish(&p.name) == key)
    }
}
