//! Error types for Sweepr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Sweepr
#[derive(Debug, Error)]
pub enum SweeprError {
    /// Configuration could not be resolved
    #[error("Config error: {0}")]
    Config(String),

    /// Archive store rejected a record
    #[error("Archive error: {0}")]
    Archive(String),

    /// Session file pattern was invalid
    #[error("Pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Sweepr operations
pub type Result<T> = std::result::Result<T, SweeprError>;
