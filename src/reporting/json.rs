// src/reporting/json.rs
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::core::model::IntelRecord;
use crate::error::{DossierError, DossierResult};

/// Writes a dossier as a pretty-printed JSON document
pub struct JsonReportGenerator;

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// `destination` with `.json` appended unless it already ends in it
    pub fn output_path(destination: &Path) -> PathBuf {
        let has_extension = destination
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if has_extension {
            destination.to_path_buf()
        } else {
            let mut path = destination.as_os_str().to_owned();
            path.push(".json");
            PathBuf::from(path)
        }
    }

    /// Four-space indent, non-ASCII kept literal
    pub fn to_json(record: &IntelRecord) -> DossierResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        record
            .serialize(&mut serializer)
            .map_err(|e| DossierError::SerializationError(format!("Failed to serialize dossier: {}", e)))?;
        Ok(buf)
    }

    /// Persist `record`, returning the path actually written
    pub async fn generate(&self, record: &IntelRecord, destination: &Path) -> DossierResult<PathBuf> {
        let path = Self::output_path(destination);
        let json = Self::to_json(record)?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| DossierError::FileError {
                path: path.clone(),
                message: format!("Failed to write dossier: {}", e),
            })?;

        info!("Dossier saved to {}", path.display());
        Ok(path)
    }
}

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
