// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use config::{Config as ConfigLoader, FileFormat};
use tracing::{info, warn};

pub use schema::{
    Config, GlobalConfig, TargetConfig, PatternConfig, RegistryConfig,
    PhoneConfig, ImageConfig, LinksConfig, PlatformTemplate,
};

use crate::error::{DossierResult, DossierError};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

impl Config {
    /// Load configuration, layering defaults, the user file and environment
    pub fn load(config_path: Option<&Path>) -> DossierResult<Self> {
        info!("Loading configuration");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if path.exists() {
                config_builder = config_builder.add_source(config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                return Err(DossierError::FileError {
                    path: path.to_path_buf(),
                    message: "Configuration file not found".to_string(),
                });
            }
        } else {
            let default_path = Self::get_default_config_path();
            if default_path.exists() {
                config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                info!("Loading configuration from: {}", default_path.display());
            }
        }

        // Environment variables, e.g. DOSSIER__GLOBAL__REQUEST_TIMEOUT_SECS=30
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("DOSSIER")
                .separator("__")
                .try_parsing(true)
        );

        let config: Config = config_builder
            .build()
            .map_err(|e| DossierError::ConfigError(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| DossierError::ConfigError(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// The built-in defaults without any user or environment overrides
    pub fn embedded() -> DossierResult<Self> {
        toml::from_str(DEFAULT_CONFIG)
            .map_err(|e| DossierError::ConfigError(format!("Invalid built-in configuration: {}", e)))
    }

    fn validate(&self) -> DossierResult<()> {
        if self.global.user_agents.is_empty() {
            return Err(DossierError::ConfigError("global.user_agents must not be empty".to_string()));
        }
        if self.global.request_timeout_secs == 0 || self.global.lookup_timeout_secs == 0 {
            return Err(DossierError::ConfigError("timeouts must be at least one second".to_string()));
        }
        if !self.image.reverse_search_template.contains("{url}") {
            warn!("image.reverse_search_template has no {{url}} placeholder");
        }
        Ok(())
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dossier/config.toml")
    }

    /// Write the built-in defaults to the default location
    pub fn init(force: bool) -> DossierResult<PathBuf> {
        let config_path = Self::get_default_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DossierError::FileError {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
        }

        if config_path.exists() && !force {
            return Err(DossierError::ConfigError(
                format!("Configuration already exists at {}. Use --force to overwrite.", config_path.display())
            ));
        }

        Self::embedded()?.save(&config_path)?;

        Ok(config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> DossierResult<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| DossierError::SerializationError(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, config_str)
            .map_err(|e| DossierError::FileError {
                path: path.to_path_buf(),
                message: format!("Failed to write configuration: {}", e),
            })?;

        info!("Configuration saved to {}", path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = Config::embedded().unwrap();

        assert_eq!(config.global.request_timeout_secs, 15);
        assert_eq!(config.target.base_url, "https://t.me/");
        assert_eq!(config.image.excluded_tags, vec!["JPEGThumbnail", "TIFFThumbnail"]);
        assert_eq!(config.links.platforms.len(), 6);
        assert!(config.phone.carriers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[global]\nrequest_timeout_secs = 42\n\n[phone.carriers]\n\"+4479\" = \"ExampleTel\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.global.request_timeout_secs, 42);
        // untouched keys keep their defaults
        assert_eq!(config.global.lookup_timeout_secs, 20);
        assert_eq!(config.phone.carriers.get("+4479").map(String::as_str), Some("ExampleTel"));
    }

    #[test]
    fn test_load_missing_user_file_is_an_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(DossierError::FileError { .. })));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let config = Config::embedded().unwrap();
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.patterns.phone, config.patterns.phone);
        assert_eq!(reloaded.registry.reserved_networks, config.registry.reserved_networks);
    }

    #[test]
    fn test_concurrency_never_zero() {
        let mut config = Config::embedded().unwrap();
        config.global.max_concurrent_lookups = 0;
        assert!(config.global.concurrency() >= 1);

        config.global.max_concurrent_lookups = 3;
        assert_eq!(config.global.concurrency(), 3);
    }
}
