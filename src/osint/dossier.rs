// src/osint/dossier.rs
use chrono::{DateTime, Utc};

use crate::core::model::{
    CrossPlatformLinks, DomainIntel, ExifTags, FingerprintSet, IntelRecord, PhoneIntel,
    ProfilePage, UNKNOWN,
};

/// Everything the enrichment stages produced for one run
#[derive(Debug, Clone)]
pub struct DossierParts {
    pub emails: Vec<String>,
    pub domains: Vec<DomainIntel>,
    pub phones: Vec<PhoneIntel>,
    pub exif: ExifTags,
    pub reverse_image_search_url: Option<String>,
    pub cross_platform_links: CrossPlatformLinks,
    pub fingerprints: FingerprintSet,
}

/// Canonical display name used for fingerprinting and the record
pub fn display_name_of(page: &ProfilePage) -> String {
    page.display_name.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

/// Canonical biography used for extraction, fingerprinting and the record
pub fn biography_of(page: &ProfilePage) -> String {
    page.biography.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

/// Merge the basic identifiers and stage outputs into one record.
///
/// Shape only: nothing is reordered, dropped or recomputed.
pub fn assemble(
    identifier: &str,
    collected_at: DateTime<Utc>,
    page: &ProfilePage,
    parts: DossierParts,
) -> IntelRecord {
    IntelRecord {
        collected_at,
        username: format!("@{}", identifier),
        display_name: display_name_of(page),
        bio: biography_of(page),
        profile_photo_url: page.photo_url.clone(),
        emails_found: parts.emails,
        linked_domains: parts.domains,
        phone_intel: parts.phones,
        exif_data: parts.exif,
        reverse_image_search_url: parts.reverse_image_search_url,
        cross_platform_searches: parts.cross_platform_links,
        fingerprints: parts.fingerprints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osint::fingerprint::fingerprint;

    fn parts() -> DossierParts {
        DossierParts {
            emails: vec!["b@x.io".to_string(), "a@x.io".to_string(), "b@x.io".to_string()],
            domains: vec![
                DomainIntel::unresolved("https://z.test", "z.test"),
                DomainIntel::unresolved("https://a.test", "a.test"),
            ],
            phones: vec![PhoneIntel {
                number_string: "+1 650-253-0000".to_string(),
                location: "United States".to_string(),
                carrier: UNKNOWN.to_string(),
            }],
            exif: ExifTags::from([("Image Make".to_string(), "\"Canon\"".to_string())]),
            reverse_image_search_url: None,
            cross_platform_links: CrossPlatformLinks::new(),
            fingerprints: fingerprint("N/A", "N/A"),
        }
    }

    #[test]
    fn test_assemble_preserves_order_and_content() {
        let now = Utc::now();
        let record = assemble("jane", now, &ProfilePage::default(), parts());

        assert_eq!(record.collected_at, now);
        assert_eq!(record.username, "@jane");
        assert_eq!(record.emails_found, vec!["b@x.io", "a@x.io", "b@x.io"]);
        assert_eq!(record.linked_domains[0].host, "z.test");
        assert_eq!(record.linked_domains[1].host, "a.test");
        assert_eq!(record.phone_intel.len(), 1);
        assert_eq!(record.exif_data["Image Make"], "\"Canon\"");
    }

    #[test]
    fn test_missing_identifiers_become_unknown() {
        let record = assemble("ghost", Utc::now(), &ProfilePage::default(), parts());

        assert_eq!(record.display_name, UNKNOWN);
        assert_eq!(record.bio, UNKNOWN);
        assert_eq!(record.profile_photo_url, None);
    }

    #[test]
    fn test_present_identifiers_are_copied() {
        let page = ProfilePage {
            display_name: Some("Jane".to_string()),
            biography: Some(String::new()),
            photo_url: Some("https://cdn.test/p.jpg".to_string()),
        };
        let record = assemble("jane", Utc::now(), &page, parts());

        assert_eq!(record.display_name, "Jane");
        assert_eq!(record.bio, "");
        assert_eq!(record.profile_photo_url.as_deref(), Some("https://cdn.test/p.jpg"));
    }
}
