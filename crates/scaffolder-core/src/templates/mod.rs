//! Template discovery, rendering and post-render hooks
//!
//! This module provides:
//! - The handlebars engine shared by files, prompts and descriptor expressions
//! - Template file discovery with the `.hbs` / `_name.hbs` naming rules
//! - The renderer that drives prompts, `transform`, per-file rendering and `finished`
//! - Version compatibility checking against a descriptor's `version`

pub mod discover;
pub mod engine;
pub mod finish;
pub mod renderer;
pub mod version;

pub use discover::{discover, TemplateFile};
pub use engine::TemplateEngine;
pub use finish::{DataUtils, FinishContext, FsUtils};
pub use renderer::TemplateRenderer;
pub use version::check_compatibility;
