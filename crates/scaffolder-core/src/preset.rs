//! Persisted answer presets, one JSON file per template address
//!
//! Presets are keyed by a SHA-256 fingerprint of the raw template address, so
//! the same address always maps to the same file regardless of where the
//! project is generated. The store is not locked: concurrent runs against the
//! same address race, and the last writer wins.

use crate::answers::AnswerSet;
use crate::config;
use crate::error::{Result, ScaffoldError};
use crate::settings::Settings;
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Deterministic storage key for a template address
pub fn fingerprint(address: &str) -> String {
    hex::encode(Sha256::digest(address.as_bytes()))
}

/// Preset storage rooted at a process-wide directory
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.preset_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the preset for an address
    pub fn path_for(&self, address: &str) -> PathBuf {
        self.dir.join(format!("{}.json", fingerprint(address)))
    }

    /// Load the preset for `address`, honoring the descriptor found in `lookup_dir`
    ///
    /// A disabled policy returns an empty set without touching storage. A
    /// missing, unreadable or corrupt preset also yields an empty set.
    pub fn load(&self, address: &str, lookup_dir: &Path, settings: &Settings) -> Result<AnswerSet> {
        let descriptor = config::load(lookup_dir, settings)?;
        if !descriptor.save_preset.is_enabled() {
            debug!("Presets disabled for {}", address);
            return Ok(AnswerSet::new());
        }

        let preset = self.read(address);
        Ok(descriptor.save_preset.apply(&preset))
    }

    /// Read the stored preset without any policy filtering
    pub fn read(&self, address: &str) -> AnswerSet {
        let path = self.path_for(address);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return AnswerSet::new(),
            Err(e) => {
                warn!("Ignoring unreadable preset {}: {}", path.display(), e);
                return AnswerSet::new();
            }
        };
        match serde_json::from_str::<AnswerSet>(&content) {
            Ok(preset) => {
                debug!("Loaded preset {} ({} keys)", path.display(), preset.len());
                preset
            }
            Err(e) => {
                warn!("Ignoring corrupt preset {}: {}", path.display(), e);
                AnswerSet::new()
            }
        }
    }

    /// Persist `answers` for `address`, replacing any previous preset whole
    pub fn save(&self, address: &str, answers: &AnswerSet) -> Result<PathBuf> {
        let fp = fingerprint(address);
        let path = self.dir.join(format!("{}.json", fp));
        let json = serde_json::to_vec_pretty(answers)?;

        std::fs::create_dir_all(&self.dir).map_err(|e| ScaffoldError::preset_io(&fp, e))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| ScaffoldError::preset_io(&fp, e))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ScaffoldError::preset_io(&fp, e))?;
        tmp.persist(&path)
            .map_err(|e| ScaffoldError::preset_io(&fp, e.error))?;

        debug!("Saved preset {} ({} keys)", path.display(), answers.len());
        Ok(path)
    }

    /// Delete the preset for `address`; returns whether one existed
    pub fn remove(&self, address: &str) -> Result<bool> {
        let path = self.path_for(address);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ScaffoldError::preset_io(fingerprint(address), e)),
        }
    }
}
