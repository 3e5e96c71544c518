pub mod app;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod osint;
pub mod reporting;
pub mod utils;

// Re-export main types for easier access
pub use app::{watch_interrupts, App, RunOptions, RunReport};
pub use config::Config;
pub use core::model::IntelRecord;
pub use error::{DossierError, DossierResult};
pub use osint::{Collaborators, IntelCollector};
