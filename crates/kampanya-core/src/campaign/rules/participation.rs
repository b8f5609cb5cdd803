//! Participation method detection (SMS keyword, mobile app, automatic).

use super::keywords::fold_turkish;
use super::patterns::{AUTOMATIC_PARTICIPATION, SMS_INSTRUCTION, SMS_NUMBER_FIRST};
use super::FieldExtractor;
use crate::models::campaign::Participation;
use crate::models::config::SourceProfile;

/// Detects how a card holder joins a campaign.
#[derive(Debug, Clone, Default)]
pub struct ParticipationDetector {
    /// (folded, display) app names.
    apps: Vec<(String, String)>,
    /// SMS number used when the text names only a keyword.
    default_number: Option<String>,
}

impl ParticipationDetector {
    /// Build a detector from the given profiles. The SMS fallback number is
    /// only used when exactly one profile is given.
    pub fn new(profiles: &[&SourceProfile]) -> Self {
        let apps = profiles
            .iter()
            .flat_map(|p| p.apps.iter())
            .map(|app| (fold_turkish(app), app.clone()))
            .filter(|(folded, _)| !folded.is_empty())
            .collect();

        let default_number = match profiles {
            [profile] => profile.sms_numbers.first().cloned(),
            _ => None,
        };

        Self {
            apps,
            default_number,
        }
    }

    /// Detect the participation method; SMS wins over apps, apps over automatic.
    pub fn detect(&self, text: &str) -> Option<Participation> {
        self.sms(text)
            .or_else(|| self.app(text))
            .or_else(|| AUTOMATIC_PARTICIPATION.is_match(text).then_some(Participation::Automatic))
    }

    fn sms(&self, text: &str) -> Option<Participation> {
        SMS_INSTRUCTION.captures_iter(text).find_map(|caps| {
            let keyword = caps.get(1)?.as_str();
            let number = caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .or_else(|| number_before(text, keyword))
                .or_else(|| self.default_number.clone())?;

            Some(Participation::Sms {
                keyword: keyword.to_string(),
                number,
            })
        })
    }

    fn app(&self, text: &str) -> Option<Participation> {
        let folded = fold_turkish(text);
        self.apps
            .iter()
            .filter_map(|(key, name)| folded.find(key.as_str()).map(|pos| (pos, name)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, name)| Participation::App { name: name.clone() })
    }
}

// "4566'ya KAZAN yazıp SMS"
fn number_before(text: &str, keyword: &str) -> Option<String> {
    SMS_NUMBER_FIRST
        .captures_iter(text)
        .find(|caps| caps.get(2).is_some_and(|m| m.as_str() == keyword))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl FieldExtractor for ParticipationDetector {
    type Output = Participation;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.detect(text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut found: Vec<Participation> = self.sms(text).into_iter().collect();
        found.extend(self.app(text));
        if AUTOMATIC_PARTICIPATION.is_match(text) {
            found.push(Participation::Automatic);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::KampanyaConfig;

    fn detector_for(source: Option<&str>) -> ParticipationDetector {
        let config = KampanyaConfig::default();
        match source.and_then(|s| config.profile(s)) {
            Some(profile) => ParticipationDetector::new(&[profile]),
            None => ParticipationDetector::new(&config.profiles.iter().collect::<Vec<_>>()),
        }
    }

    #[test]
    fn test_sms_with_number() {
        let detector = detector_for(None);
        assert_eq!(
            detector.detect("Katılmak için KAZAN yazıp 4566'ya SMS gönderin."),
            Some(Participation::Sms {
                keyword: "KAZAN".to_string(),
                number: "4566".to_string(),
            })
        );
    }

    #[test]
    fn test_sms_number_first() {
        let detector = detector_for(None);
        assert_eq!(
            detector.detect("4402'ye MAXI yazıp SMS gönderin"),
            Some(Participation::Sms {
                keyword: "MAXI".to_string(),
                number: "4402".to_string(),
            })
        );
    }

    #[test]
    fn test_sms_number_from_profile() {
        let detector = detector_for(Some("garanti"));
        assert_eq!(
            detector.detect("BONUS yazıp SMS ile katılın"),
            Some(Participation::Sms {
                keyword: "BONUS".to_string(),
                number: "3340".to_string(),
            })
        );
        assert_eq!(detector_for(None).detect("BONUS yazıp SMS ile katılın"), None);
    }

    #[test]
    fn test_earliest_app_wins() {
        let detector = detector_for(Some("akbank"));
        assert_eq!(
            detector.detect("Akbank Mobil veya Jüzdan üzerinden katılın"),
            Some(Participation::App {
                name: "Akbank Mobil".to_string()
            })
        );
    }

    #[test]
    fn test_automatic() {
        let detector = detector_for(None);
        assert_eq!(
            detector.detect("Kampanyaya katılım gerektirmez."),
            Some(Participation::Automatic)
        );
        assert_eq!(detector.detect("500 TL ve üzeri harcamaya 50 TL puan"), None);
    }

    #[test]
    fn test_extract_all_lists_every_method() {
        let detector = detector_for(Some("akbank"));
        let found =
            detector.extract_all("KAZAN yazıp 4566'ya SMS gönderin ya da Jüzdan'dan katılın");
        assert_eq!(found.len(), 2);
    }
}
