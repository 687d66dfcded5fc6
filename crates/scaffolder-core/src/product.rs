//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface each scaffolding binary implements to
//! configure names, environment overrides and post-create instructions.

use std::path::Path;

/// Configuration trait for scaffolding CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Where presets are stored and how to override that
/// - Descriptor and template naming conventions
/// - Post-create instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for data directories, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable name for overriding the preset directory
    fn preset_dir_env(&self) -> &'static str;

    /// File name of the per-template descriptor at the template root
    fn descriptor_file(&self) -> &'static str {
        "scaffold.config.yaml"
    }

    /// Suffix that marks a file as a template
    fn template_suffix(&self) -> &'static str {
        ".hbs"
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;
}
