//! Shared ids, domain types, config, and error definitions for the price forecaster.

pub mod config;
pub mod error;
pub mod types;

pub use config::ForecasterConfig;
pub use error::Error;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
