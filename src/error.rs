use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::model::IntelRecord;

#[derive(Error, Debug)]
pub enum DossierError {
    #[error("Failed to load profile {identifier}: {message}")]
    PageLoad {
        identifier: String,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Resolution failed: {host} - {message}")]
    ResolutionError {
        host: String,
        message: String,
    },

    #[error("Registry lookup failed: {address} - {message}")]
    RegistryError {
        address: IpAddr,
        message: String,
    },

    #[error("Address {0} belongs to a reserved range")]
    ReservedAddress(IpAddr),

    #[error("Image analysis failed: {0}")]
    ImageError(String),

    #[error("Timeout error: {operation} exceeded {seconds} seconds")]
    TimeoutError {
        operation: String,
        seconds: u64,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File error: {path:?} - {message}")]
    FileError {
        path: PathBuf,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Run aborted before completion")]
    Aborted {
        /// Whatever was assembled before the interrupt; absent if the page never loaded
        partial: Option<Box<IntelRecord>>,
    },

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl From<anyhow::Error> for DossierError {
    fn from(error: anyhow::Error) -> Self {
        DossierError::UnexpectedError(error.to_string())
    }
}

impl From<reqwest::Error> for DossierError {
    fn from(error: reqwest::Error) -> Self {
        DossierError::NetworkError(error.to_string())
    }
}

pub type DossierResult<T> = std::result::Result<T, DossierError>;
