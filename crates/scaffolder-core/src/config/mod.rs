//! Template descriptor loading and cleanup
//!
//! The descriptor lives at the root of the cloned template and must never
//! ship with the generated project, so [`cleanup`] removes it once the
//! scaffold run is over.

pub mod descriptor;

use crate::error::{Result, ScaffoldError};
use crate::settings::Settings;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

pub use descriptor::{
    Choice, FinishAction, Question, QuestionKind, SavePresetPolicy, TemplateDescriptor,
};

/// Load the descriptor in `dir`, or the default one when there is none
pub fn load(dir: &Path, settings: &Settings) -> Result<TemplateDescriptor> {
    let path = settings.descriptor_path(dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No descriptor at {}, using defaults", path.display());
            return Ok(TemplateDescriptor::default());
        }
        Err(e) => return Err(ScaffoldError::descriptor(&path, e.to_string())),
    };

    let descriptor = TemplateDescriptor::from_yaml(&content)
        .map_err(|message| ScaffoldError::descriptor(&path, message))?;
    descriptor
        .validate()
        .map_err(|message| ScaffoldError::descriptor(&path, message))?;

    debug!(
        "Loaded descriptor {} (prompts: {}, save_preset: {:?})",
        path.display(),
        descriptor.prompts.as_ref().map_or(0, Vec::len),
        descriptor.save_preset
    );
    Ok(descriptor)
}

/// Remove the descriptor from `dir`; a missing file is not an error
pub fn cleanup(dir: &Path, settings: &Settings) -> Result<()> {
    let path = settings.descriptor_path(dir);
    match std::fs::remove_file(&path) {
        Ok(()) => {
            debug!("Removed descriptor {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
