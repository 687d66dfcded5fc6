//! Top-level scaffold workflow
//!
//! clone → load descriptor → merge preset with overrides → render →
//! save preset → remove descriptor.

use crate::answers::{self, AnswerSet};
use crate::clone::{clone_repo_and_clean, RepoCloner};
use crate::config;
use crate::error::Result;
use crate::preset::PresetStore;
use crate::prompt::Prompter;
use crate::settings::Settings;
use crate::templates::{check_compatibility, TemplateRenderer};
use std::path::Path;
use tracing::{info, warn};

/// Runs scaffold operations with a given clone transport and prompt front-end
pub struct Scaffolder<C, P> {
    settings: Settings,
    store: PresetStore,
    renderer: TemplateRenderer,
    cloner: C,
    prompter: P,
}

impl<C: RepoCloner, P: Prompter> Scaffolder<C, P> {
    pub fn new(settings: Settings, cloner: C, prompter: P) -> Self {
        Self {
            store: PresetStore::from_settings(&settings),
            renderer: TemplateRenderer::new(settings.clone()),
            settings,
            cloner,
            prompter,
        }
    }

    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    /// Scaffold `source` into `destination` and return the final answers
    ///
    /// `overrides` beat any saved preset. Once the clone exists the
    /// descriptor is removed whether or not the rest succeeds; a failed
    /// removal is only logged.
    pub async fn run(
        &mut self,
        source: &str,
        destination: &Path,
        overrides: &AnswerSet,
    ) -> Result<AnswerSet> {
        clone_repo_and_clean(&self.cloner, source, destination).await?;

        let result = self.scaffold_cloned(source, destination, overrides);
        self.remove_descriptor(destination);
        result
    }

    /// Render an existing directory without presets, then remove its descriptor
    pub fn render_in_place(&mut self, dir: &Path, overrides: &AnswerSet) -> Result<AnswerSet> {
        let result = self.renderer.render(dir, overrides, &mut self.prompter);
        self.remove_descriptor(dir);
        result
    }

    fn scaffold_cloned(
        &mut self,
        source: &str,
        destination: &Path,
        overrides: &AnswerSet,
    ) -> Result<AnswerSet> {
        let descriptor = config::load(destination, &self.settings)?;
        if let Some(warning) = check_compatibility(
            &self.settings.cli_version,
            descriptor.version.as_deref(),
            &self.settings.upgrade_command,
        ) {
            warn!("{}", warning);
        }

        let preset = self.store.load(source, destination, &self.settings)?;
        let defaults = answers::merged(&preset, overrides);

        let answers = self
            .renderer
            .render(destination, &defaults, &mut self.prompter)?;

        if descriptor.save_preset.is_enabled() {
            let keep = answers::merged(&descriptor.save_preset.apply(&answers), overrides);
            let path = self.store.save(source, &keep)?;
            info!("Saved preset for {} to {}", source, path.display());
        }

        Ok(answers)
    }

    fn remove_descriptor(&self, dir: &Path) {
        if let Err(e) = config::cleanup(dir, &self.settings) {
            warn!("Could not remove descriptor from {}: {}", dir.display(), e);
        }
    }
}
