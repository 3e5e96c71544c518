pub mod model;

pub use model::{
    Artifacts, CrossPlatformLinks, DomainIntel, ExifTags, FingerprintSet, IntelRecord,
    PhoneIntel, ProfilePage, RegistryRecord, RESOLUTION_FAILED, UNKNOWN,
};
