// src/osint/phone.rs
use std::collections::BTreeMap;
use indicatif::ProgressBar;
use isocountry::CountryCode;
use phonenumber::{Mode, PhoneNumber};
use tracing::{debug, info};

use crate::config::PhoneConfig;
use crate::core::model::{PhoneIntel, UNKNOWN};

/// Filters phone candidates down to real numbers and describes them.
///
/// Candidates that do not parse or fail numbering-plan validation are
/// dropped without a trace.
pub struct PhoneEnricher {
    carriers: BTreeMap<String, String>,
}

impl PhoneEnricher {
    pub fn new(config: &PhoneConfig) -> Self {
        Self {
            carriers: config.carriers.clone(),
        }
    }

    pub fn enrich(&self, candidates: &[String], progress: &ProgressBar) -> Vec<PhoneIntel> {
        if candidates.is_empty() {
            return Vec::new();
        }

        info!("Analyzing {} phone number candidates", candidates.len());
        progress.set_length(candidates.len() as u64);

        let intel: Vec<PhoneIntel> = candidates
            .iter()
            .filter_map(|candidate| {
                let result = self.enrich_one(candidate);
                progress.inc(1);
                result
            })
            .collect();

        debug!("{} of {} phone candidates validated", intel.len(), candidates.len());
        intel
    }

    pub fn enrich_one(&self, candidate: &str) -> Option<PhoneIntel> {
        // No default region: only internationally formatted numbers can parse
        let number = match phonenumber::parse(None, candidate) {
            Ok(number) => number,
            Err(e) => {
                debug!("Discarding phone candidate {:?}: {}", candidate, e);
                return None;
            }
        };

        if !phonenumber::is_valid(&number) {
            debug!("Discarding phone candidate {:?}: not a valid number", candidate);
            return None;
        }

        Some(PhoneIntel {
            number_string: candidate.to_string(),
            location: location_for(&number).unwrap_or_else(|| UNKNOWN.to_string()),
            carrier: self.carrier_for(&number).unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }

    /// Longest configured E.164 prefix that matches the number
    fn carrier_for(&self, number: &PhoneNumber) -> Option<String> {
        let e164 = number.format().mode(Mode::E164).to_string();
        self.carriers
            .iter()
            .filter(|(prefix, _)| e164.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, name)| name.clone())
    }
}

/// English country name of the number's region, or the bare region code
/// for regions without an ISO 3166 entry
fn location_for(number: &PhoneNumber) -> Option<String> {
    let region = format!("{:?}", number.country().id()?);
    let name = CountryCode::for_alpha2(&region)
        .map(|country| country.name().to_string())
        .unwrap_or(region);
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enricher() -> PhoneEnricher {
        PhoneEnricher::new(&PhoneConfig::default())
    }

    #[test]
    fn test_valid_international_number() {
        let intel = enricher().enrich_one("+1 650-253-0000").unwrap();

        assert_eq!(intel.number_string, "+1 650-253-0000");
        assert!(intel.location.starts_with("United States"));
        assert_eq!(intel.carrier, UNKNOWN);
    }

    #[test]
    fn test_unparseable_and_invalid_candidates_are_dropped() {
        let ex = enricher();

        // no country code and no default region
        assert!(ex.enrich_one("650-253-0000").is_none());
        // unassigned country code
        assert!(ex.enrich_one("+999 123 4567").is_none());
        // not a phone number at all
        assert!(ex.enrich_one("2024-0101-1999").is_none());
    }

    #[test]
    fn test_carrier_prefix_longest_match() {
        let mut config = PhoneConfig::default();
        config.carriers.insert("+1".to_string(), "Generic NANP".to_string());
        config.carriers.insert("+1650253".to_string(), "Example Carrier".to_string());
        let ex = PhoneEnricher::new(&config);

        let intel = ex.enrich_one("+1 650-253-0000").unwrap();
        assert_eq!(intel.carrier, "Example Carrier");
    }

    #[test]
    fn test_output_never_longer_than_input() {
        let candidates: Vec<String> = vec![
            "+1 650-253-0000".to_string(),
            "12 345 678".to_string(),
            "+999 123 4567".to_string(),
            "+1 650-253-0000".to_string(),
        ];

        let progress = ProgressBar::hidden();
        let intel = enricher().enrich(&candidates, &progress);

        assert!(intel.len() <= candidates.len());
        assert_eq!(intel.len(), 2);
        assert!(intel.iter().all(|p| phonenumber::is_valid(&phonenumber::parse(None, &p.number_string).unwrap())));
        assert_eq!(progress.position(), 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(enricher().enrich(&[], &ProgressBar::hidden()).is_empty());
    }

    #[test]
    fn test_location_covers_every_region() {
        let intel = enricher().enrich_one("+352 621 123 456").unwrap();
        assert_eq!(intel.location, "Luxembourg");
    }
}
