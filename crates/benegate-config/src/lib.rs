//! Configuration for the Benegate data access gateway.
//!
//! This crate provides:
//! - Settings loading from a TOML file with environment-variable overrides
//! - Feature flags with boolean and time-windowed evaluation
//!
//! The feature-flag registry is the production implementation of the policy
//! switch consulted by access-type expiration checks; operators toggle
//! `limit_data_access` at runtime without a redeploy.

pub mod feature_flags;
pub mod settings;

// Re-export main types
pub use feature_flags::{
    FeatureFlag, FeatureFlagType, FeatureFlags, LIMIT_DATA_ACCESS, SharedFeatureFlags,
};
pub use settings::{AccessSettings, MessageSettings, Settings, load_settings};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
