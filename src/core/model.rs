// src/core/model.rs
use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Placeholder for any enrichment field that could not be determined
pub const UNKNOWN: &str = "N/A";

/// Recorded as the address of a host that did not resolve
pub const RESOLUTION_FAILED: &str = "Resolution Failed";

/// Embedded image metadata, tag name -> stringified value
pub type ExifTags = BTreeMap<String, String>;

/// Platform label -> constructed search URL
pub type CrossPlatformLinks = BTreeMap<String, String>;

/// Basic identifiers scraped from the rendered profile page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub display_name: Option<String>,
    pub biography: Option<String>,
    pub photo_url: Option<String>,
}

/// Raw candidates pulled out of free text, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifacts {
    pub emails: Vec<String>,
    pub urls: Vec<String>,
    pub phone_candidates: Vec<String>,
}

impl Artifacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.urls.is_empty() && self.phone_candidates.is_empty()
    }
}

/// Enrichment result for one extracted URL.
///
/// Every field is always present; anything that could not be looked up
/// carries [`UNKNOWN`] (or [`RESOLUTION_FAILED`] for the address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainIntel {
    pub url: String,
    #[serde(rename = "domain")]
    pub host: String,
    pub ip_address: String,
    pub country: String,
    pub organization: String,
    pub asn: String,
}

impl DomainIntel {
    /// Record for a host whose address could not be resolved
    pub fn unresolved(url: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            host: host.into(),
            ip_address: RESOLUTION_FAILED.to_string(),
            country: UNKNOWN.to_string(),
            organization: UNKNOWN.to_string(),
            asn: UNKNOWN.to_string(),
        }
    }

    /// Record for a resolved host without usable registry data
    pub fn resolved(url: impl Into<String>, host: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            ..Self::unresolved(url, host)
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.ip_address != RESOLUTION_FAILED
    }
}

/// Ownership data returned by a registry lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub country: Option<String>,
    pub organization: Option<String>,
    pub asn: Option<String>,
    pub asn_description: Option<String>,
}

impl RegistryRecord {
    /// `"<asn> - <description>"`, with unknown parts spelled out
    pub fn asn_descriptor(&self) -> String {
        format!(
            "{} - {}",
            self.asn.as_deref().unwrap_or(UNKNOWN),
            self.asn_description.as_deref().unwrap_or(UNKNOWN)
        )
    }
}

/// A phone candidate that passed numbering-plan validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneIntel {
    pub number_string: String,
    pub location: String,
    pub carrier: String,
}

/// Content digests over the canonical identity fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintSet {
    #[serde(rename = "md5")]
    pub weak: String,
    #[serde(rename = "sha256")]
    pub strong: String,
}

/// The complete dossier for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelRecord {
    #[serde(rename = "recon_timestamp_utc")]
    pub collected_at: DateTime<Utc>,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub profile_photo_url: Option<String>,
    pub emails_found: Vec<String>,
    pub linked_domains: Vec<DomainIntel>,
    pub phone_intel: Vec<PhoneIntel>,
    pub exif_data: ExifTags,
    pub reverse_image_search_url: Option<String>,
    pub cross_platform_searches: CrossPlatformLinks,
    pub fingerprints: FingerprintSet,
}
