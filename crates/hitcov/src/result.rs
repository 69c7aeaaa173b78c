//! Result and error types for hitcov.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for hitcov operations
pub type HitcovResult<T> = Result<T, HitcovError>;

/// Errors that can occur while aggregating or reporting coverage
#[derive(Debug, Error)]
pub enum HitcovError {
    /// Script identifier has no matching package root
    #[error("Cannot resolve script identifier: {script_id}")]
    UnresolvableIdentifier {
        /// Identifier that failed to resolve
        script_id: String,
    },

    /// Resolved source file could not be read
    #[error("Source unavailable for {}: {message}", path.display())]
    SourceUnavailable {
        /// Path that failed to load
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Coverage sample violates the collector protocol
    #[error("Malformed coverage sample for {script_id}: {message}")]
    MalformedSample {
        /// Script the sample belongs to
        script_id: String,
        /// Error message
        message: String,
    },

    /// Base path cannot be used to relativize a reported path
    #[error("Cannot express {} relative to base path {}", path.display(), base_path.display())]
    FilterMisconfiguration {
        /// Configured base path
        base_path: PathBuf,
        /// Path being reported
        path: PathBuf,
    },

    /// Package table could not be loaded
    #[error("Invalid package config {}: {message}", path.display())]
    PackageConfig {
        /// Package config file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Report configuration is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl HitcovError {
    /// Create an unresolvable identifier error
    #[must_use]
    pub fn unresolvable(script_id: impl Into<String>) -> Self {
        Self::UnresolvableIdentifier {
            script_id: script_id.into(),
        }
    }

    /// Create a malformed sample error
    #[must_use]
    pub fn malformed(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSample {
            script_id: script_id.into(),
            message: message.into(),
        }
    }

    /// Create a package config error
    #[must_use]
    pub fn package_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PackageConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
