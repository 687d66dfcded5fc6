//! Template file discovery and destination naming

use crate::error::{Result, ScaffoldError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered template file and where its rendered output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl TemplateFile {
    /// Compute the destination for a template path
    ///
    /// `_name.hbs` keeps the suffix and loses the underscore; anything else
    /// loses the suffix. Returns `None` when the name does not carry the suffix
    /// or nothing would remain after stripping it.
    pub fn from_path(source: PathBuf, suffix: &str) -> Option<Self> {
        let file_name = source.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(suffix)?;

        let dest_name = match file_name.strip_prefix('_') {
            Some(unprefixed) if unprefixed.len() > suffix.len() => unprefixed.to_string(),
            Some(_) => return None,
            None if stem.is_empty() => return None,
            None => stem.to_string(),
        };

        let destination = source.with_file_name(dest_name);
        Some(Self {
            source,
            destination,
        })
    }
}

/// Find every template file under `dir`
///
/// Symlinks are not followed and `exclude` (the descriptor) is skipped.
/// Entries are sorted by file name within each directory so the order is
/// stable across runs.
///
/// Fails before anything is written when a suffixed file has no usable
/// output name (`.hbs`, `_.hbs`, non UTF-8), or when one template's output
/// would land on another template's source or output.
pub fn discover(dir: &Path, suffix: &str, exclude: &Path) -> Result<Vec<TemplateFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ScaffoldError::render(&path, e.to_string())
        })?;
        if !entry.file_type().is_file() || entry.path() == exclude {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(suffix) {
            continue;
        }
        let path = entry.into_path();
        match TemplateFile::from_path(path.clone(), suffix) {
            Some(file) => files.push(file),
            None => {
                return Err(ScaffoldError::render(
                    &path,
                    "template file name leaves no output name",
                ))
            }
        }
    }
    check_collisions(&files)?;
    Ok(files)
}

fn check_collisions(files: &[TemplateFile]) -> Result<()> {
    let mut claimed: HashMap<&Path, &Path> = HashMap::new();
    for file in files {
        claimed.insert(file.source.as_path(), file.source.as_path());
    }
    for file in files {
        if let Some(other) = claimed.insert(file.destination.as_path(), file.source.as_path()) {
            if other != file.source.as_path() {
                return Err(ScaffoldError::render(
                    &file.source,
                    format!(
                        "output {} collides with template {}",
                        file.destination.display(),
                        other.display()
                    ),
                ));
            }
        }
    }
    Ok(())
}
