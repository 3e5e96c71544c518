// src/osint/mod.rs
pub mod collector;
pub mod domain;
pub mod dossier;
pub mod extractor;
pub mod fingerprint;
pub mod image;
pub mod links;
pub mod page;
pub mod phone;
pub mod registry;
pub mod resolver;

pub use collector::{Collaborators, IntelCollector};
pub use extractor::PatternExtractor;
pub use page::{PageLoader, WebPageLoader};
pub use registry::{RdapRegistry, RegistryLookup};
pub use resolver::{DnsResolver, HostResolver, TxtLookup};
