//! Error types for scaffolder-core

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using scaffolder-core's error type
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Scaffolding error types
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Template source could not be cloned
    #[error("Failed to clone '{source_address}': {message}")]
    Clone {
        source_address: String,
        message: String,
    },

    /// Template descriptor is malformed or failed validation
    #[error("Invalid template descriptor {}: {message}", path.display())]
    Descriptor { path: PathBuf, message: String },

    /// Interactive prompting was aborted or failed
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// A template file could not be rendered
    #[error("Failed to render template {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    /// Preset storage could not be written
    #[error("Preset storage error for fingerprint {fingerprint}: {source}")]
    PresetIo {
        fingerprint: String,
        #[source]
        source: std::io::Error,
    },

    /// A `finished` action failed
    #[error("Finish action '{action}' failed: {message}")]
    Finish { action: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScaffoldError {
    /// Create a clone error
    pub fn clone_failed(source_address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Clone {
            source_address: source_address.into(),
            message: message.into(),
        }
    }

    /// Create a descriptor error
    pub fn descriptor(path: &Path, message: impl Into<String>) -> Self {
        Self::Descriptor {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(path: &Path, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a preset IO error
    pub fn preset_io(fingerprint: impl Into<String>, source: std::io::Error) -> Self {
        Self::PresetIo {
            fingerprint: fingerprint.into(),
            source,
        }
    }

    /// Create a finish action error
    pub fn finish(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Finish {
            action: action.into(),
            message: message.into(),
        }
    }
}
