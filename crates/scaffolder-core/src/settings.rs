//! Process-wide scaffolding settings
//!
//! Resolved once at startup from a [`ProductConfig`] and handed to every
//! component that needs a path or naming convention.

use crate::product::ProductConfig;
use std::path::{Path, PathBuf};

/// Default descriptor file name
pub const DEFAULT_DESCRIPTOR_FILE: &str = "scaffold.config.yaml";

/// Default template file suffix
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".hbs";

/// Resolved settings shared by the loader, preset store and renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding one `<fingerprint>.json` per template address
    pub preset_dir: PathBuf,

    /// Descriptor file name, relative to the destination root
    pub descriptor_file: String,

    /// Template file suffix (including the leading dot)
    pub template_suffix: String,

    /// CLI version, compared against a descriptor's `version`
    pub cli_version: String,

    /// Shown when a template wants a newer CLI
    pub upgrade_command: String,
}

impl Settings {
    /// Settings with default naming conventions and an explicit preset directory
    pub fn new(preset_dir: impl Into<PathBuf>) -> Self {
        Self {
            preset_dir: preset_dir.into(),
            descriptor_file: DEFAULT_DESCRIPTOR_FILE.to_string(),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            cli_version: crate::DEFAULT_CLI_VERSION.to_string(),
            upgrade_command: String::new(),
        }
    }

    /// Resolve settings for a product
    ///
    /// The preset directory comes from the product's env variable when set,
    /// then the platform data directory, then `./.<name>/presets`.
    pub fn from_config<C: ProductConfig>(config: &C, cli_version: &str) -> Self {
        let preset_dir = std::env::var_os(config.preset_dir_env())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_preset_dir(config.name()));

        Self {
            preset_dir,
            descriptor_file: config.descriptor_file().to_string(),
            template_suffix: config.template_suffix().to_string(),
            cli_version: cli_version.to_string(),
            upgrade_command: config.upgrade_command().to_string(),
        }
    }

    /// Override the preset directory
    pub fn with_preset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preset_dir = dir.into();
        self
    }

    /// Location of the descriptor inside a destination directory
    pub fn descriptor_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.descriptor_file)
    }
}

fn default_preset_dir(name: &str) -> PathBuf {
    match dirs::data_dir() {
        Some(data) => data.join(name).join("presets"),
        None => PathBuf::from(format!(".{}", name)).join("presets"),
    }
}
