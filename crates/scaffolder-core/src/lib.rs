//! Scaffolder Core - Shared library for template-driven project scaffolding
//!
//! Clones a template repository, asks the questions its descriptor declares,
//! renders every `.hbs` file with the answers and remembers them as a preset
//! for the next run against the same template.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Descriptor loading, preset storage, template rendering
//! - **Layer 2: Workflow Orchestration** - `ProductConfig`, `Settings` and `Scaffolder`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{DefaultsPrompter, GitCloner, Scaffolder, Settings};
//!
//! let settings = Settings::new("/home/me/.local/share/myapp/presets");
//! let mut scaffolder = Scaffolder::new(settings, GitCloner::default(), DefaultsPrompter);
//! let answers = scaffolder
//!     .run("https://github.com/user/template.git", "my-app".as_ref(), &Default::default())
//!     .await?;
//! ```

pub mod answers;
pub mod clone;
pub mod config;
pub mod error;
pub mod preset;
pub mod product;
pub mod prompt;
pub mod scaffold;
pub mod settings;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use answers::AnswerSet;
pub use clone::{clone_repo_and_clean, CloneOptions, CloneResult, GitCloner, RepoCloner};
pub use config::{Question, QuestionKind, SavePresetPolicy, TemplateDescriptor};
pub use error::{Result, ScaffoldError};
pub use preset::{fingerprint, PresetStore};
pub use product::ProductConfig;
pub use prompt::{DefaultsPrompter, Prompter};
pub use scaffold::Scaffolder;
pub use settings::Settings;
pub use templates::{TemplateEngine, TemplateRenderer};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for template compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
