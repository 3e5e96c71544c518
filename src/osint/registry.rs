// src/osint/registry.rs
use std::net::IpAddr;
use std::sync::Arc;
use async_trait::async_trait;
use ipnetwork::IpNetwork;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::core::model::RegistryRecord;
use crate::error::{DossierError, DossierResult};
use crate::osint::resolver::TxtLookup;
use crate::utils::HttpClient;

/// Ownership lookup for a network address
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, address: IpAddr) -> DossierResult<RegistryRecord>;
}

/// Network block fields we read from an RDAP `ip` response
#[derive(Debug, Deserialize)]
struct RdapNetwork {
    country: Option<String>,
    name: Option<String>,
}

/// Address ranges that never have a public registry entry
#[derive(Debug, Clone, Default)]
pub struct ReservedRanges {
    networks: Vec<IpNetwork>,
}

impl ReservedRanges {
    pub fn parse(cidrs: &[String]) -> DossierResult<Self> {
        let networks = cidrs
            .iter()
            .map(|cidr| {
                cidr.parse::<IpNetwork>()
                    .map_err(|e| DossierError::ConfigError(format!("Invalid reserved network {}: {}", cidr, e)))
            })
            .collect::<DossierResult<Vec<_>>>()?;
        Ok(Self { networks })
    }

    pub fn contains(&self, address: IpAddr) -> bool {
        self.networks.iter().any(|net| net.contains(address))
    }
}

/// RDAP for the network block, Team Cymru DNS zones for the ASN
pub struct RdapRegistry {
    http: HttpClient,
    dns: Arc<dyn TxtLookup>,
    config: RegistryConfig,
    reserved: ReservedRanges,
}

impl RdapRegistry {
    pub fn new(http: HttpClient, dns: Arc<dyn TxtLookup>, config: RegistryConfig) -> DossierResult<Self> {
        let reserved = ReservedRanges::parse(&config.reserved_networks)?;
        Ok(Self { http, dns, config, reserved })
    }

    async fn network(&self, address: IpAddr) -> DossierResult<RdapNetwork> {
        let url = format!("{}/ip/{}", self.config.rdap_base_url.trim_end_matches('/'), address);
        self.http
            .get_json::<RdapNetwork>(&url)
            .await
            .map_err(|e| DossierError::RegistryError { address, message: e.to_string() })
    }

    /// Origin ASN and its description; either may be missing
    async fn asn(&self, address: IpAddr) -> (Option<String>, Option<String>) {
        let origin_name = origin_query_name(address, &self.config);
        let asn = match self.dns.txt(&origin_name).await {
            Ok(records) => records.iter().find_map(|r| parse_origin_txt(r)),
            Err(e) => {
                debug!("ASN origin lookup failed for {}: {}", address, e);
                None
            }
        };

        let Some(asn) = asn else {
            return (None, None);
        };

        let peer_name = format!("AS{}.{}", asn, self.config.asn_peer_zone);
        let description = match self.dns.txt(&peer_name).await {
            Ok(records) => records.iter().find_map(|r| parse_description_txt(r)),
            Err(e) => {
                debug!("ASN description lookup failed for AS{}: {}", asn, e);
                None
            }
        };

        (Some(asn), description)
    }
}

#[async_trait]
impl RegistryLookup for RdapRegistry {
    async fn lookup(&self, address: IpAddr) -> DossierResult<RegistryRecord> {
        if self.reserved.contains(address) {
            return Err(DossierError::ReservedAddress(address));
        }

        let network = self.network(address).await?;
        let (asn, asn_description) = self.asn(address).await;
        if asn.is_none() {
            warn!("No origin ASN found for {}", address);
        }

        Ok(RegistryRecord {
            country: network.country.filter(|c| !c.is_empty()),
            organization: network.name.filter(|n| !n.is_empty()),
            asn,
            asn_description,
        })
    }
}

/// `4.4.8.8.origin.asn.cymru.com` for 8.8.4.4, nibble-reversed for IPv6
pub fn origin_query_name(address: IpAddr, config: &RegistryConfig) -> String {
    match address {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            format!(
                "{}.{}.{}.{}.{}",
                octets[3], octets[2], octets[1], octets[0], config.asn_origin_zone
            )
        }
        IpAddr::V6(v6) => {
            let nibbles: Vec<String> = v6
                .octets()
                .iter()
                .flat_map(|&b| [b >> 4, b & 0x0f])
                .rev()
                .map(|n| format!("{:x}", n))
                .collect();
            format!("{}.{}", nibbles.join("."), config.asn_origin6_zone)
        }
    }
}

/// First ASN of `"15169 | 8.8.8.0/24 | US | arin | 1992-12-01"`
pub fn parse_origin_txt(record: &str) -> Option<String> {
    record
        .split('|')
        .next()?
        .split_whitespace()
        .next()
        .filter(|asn| asn.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Last field of `"15169 | US | arin | 2000-03-30 | GOOGLE - Google LLC, US"`
pub fn parse_description_txt(record: &str) -> Option<String> {
    let fields: Vec<&str> = record.split('|').map(str::trim).collect();
    if fields.len() < 5 {
        return None;
    }
    fields.last().filter(|d| !d.is_empty()).map(|d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::osint::resolver::MockTxtLookup;
    use std::time::Duration;

    fn registry_config() -> RegistryConfig {
        Config::embedded().unwrap().registry
    }

    #[test]
    fn test_origin_query_name_v4() {
        let name = origin_query_name("8.8.4.4".parse().unwrap(), &registry_config());
        assert_eq!(name, "4.4.8.8.origin.asn.cymru.com");
    }

    #[test]
    fn test_origin_query_name_v6() {
        let name = origin_query_name("2001:4860::8888".parse().unwrap(), &registry_config());
        assert!(name.starts_with("8.8.8.8.0.0.0.0"));
        assert!(name.ends_with("0.6.8.4.1.0.0.2.origin6.asn.cymru.com"));
        // 32 nibbles plus the zone labels
        assert_eq!(name.split('.').count(), 32 + 4);
    }

    #[test]
    fn test_parse_origin_txt() {
        assert_eq!(parse_origin_txt("15169 | 8.8.8.0/24 | US | arin | 1992-12-01").as_deref(), Some("15169"));
        assert_eq!(parse_origin_txt("23028 701 | 216.90.108.0/24 | US | arin |").as_deref(), Some("23028"));
        assert_eq!(parse_origin_txt("garbage"), None);
        assert_eq!(parse_origin_txt(""), None);
    }

    #[test]
    fn test_parse_description_txt() {
        assert_eq!(
            parse_description_txt("15169 | US | arin | 2000-03-30 | GOOGLE - Google LLC, US").as_deref(),
            Some("GOOGLE - Google LLC, US")
        );
        assert_eq!(parse_description_txt("15169 | US"), None);
    }

    #[test]
    fn test_reserved_ranges() {
        let ranges = ReservedRanges::parse(&registry_config().reserved_networks).unwrap();

        assert!(ranges.contains("10.1.2.3".parse().unwrap()));
        assert!(ranges.contains("127.0.0.1".parse().unwrap()));
        assert!(ranges.contains("192.168.0.10".parse().unwrap()));
        assert!(ranges.contains("::1".parse().unwrap()));
        assert!(ranges.contains("fe80::1".parse().unwrap()));
        assert!(!ranges.contains("8.8.8.8".parse().unwrap()));
        assert!(!ranges.contains("2606:4700::1111".parse().unwrap()));
    }

    #[test]
    fn test_invalid_reserved_range_is_config_error() {
        let result = ReservedRanges::parse(&["10.0.0.0/99".to_string()]);
        assert!(matches!(result, Err(DossierError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_reserved_address_short_circuits() {
        // No expectations: any DNS query would panic the mock
        let dns = MockTxtLookup::new();
        let http = HttpClient::new(&["test".to_string()], Duration::from_secs(1)).unwrap();
        let registry = RdapRegistry::new(http, Arc::new(dns), registry_config()).unwrap();

        let result = registry.lookup("192.168.1.1".parse().unwrap()).await;
        assert!(matches!(result, Err(DossierError::ReservedAddress(_))));
    }
}
