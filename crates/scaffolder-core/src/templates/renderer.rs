//! Render every template file in a destination directory
//!
//! Flow: load descriptor, discover `.hbs` files, materialize and ask prompts,
//! apply `transform`, render each file, run `finished` actions.

use super::discover::{discover, TemplateFile};
use super::engine::TemplateEngine;
use super::finish::{run_actions, FinishContext};
use crate::answers::{self, AnswerSet};
use crate::config::{self, Question, TemplateDescriptor};
use crate::error::{Result, ScaffoldError};
use crate::prompt::{default_answer, Prompter};
use crate::settings::Settings;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Renders template trees according to their descriptor
pub struct TemplateRenderer {
    settings: Settings,
    engine: TemplateEngine,
}

impl TemplateRenderer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            engine: TemplateEngine::new(),
        }
    }

    /// Render `dir` in place and return the data the files were rendered with
    ///
    /// `defaults` seed the data and, when the descriptor keeps presets, become
    /// the defaults of matching questions that have none of their own.
    ///
    /// A failure part-way through leaves earlier files rendered and later
    /// ones untouched; no source is removed before its output is in place.
    pub fn render<P: Prompter>(
        &self,
        dir: &Path,
        defaults: &AnswerSet,
        prompter: &mut P,
    ) -> Result<AnswerSet> {
        let descriptor = config::load(dir, &self.settings)?;
        let descriptor_path = self.settings.descriptor_path(dir);

        let files = discover(dir, &self.settings.template_suffix, &descriptor_path)?;
        debug!("Discovered {} template files in {}", files.len(), dir.display());

        let mut data = defaults.clone();

        if descriptor.has_prompts() {
            let questions = self.questions(&descriptor, dir, defaults)?;
            let collected = prompter.ask(&questions)?;
            answers::deep_merge(&mut data, collected);

            // Questions the prompter left unanswered fall back to their kind's default
            for q in &questions {
                if !data.contains_key(&q.name) {
                    data.insert(q.name.clone(), default_answer(q));
                }
            }
        }

        let data = descriptor
            .apply_transform(&self.engine, data)
            .map_err(|message| ScaffoldError::descriptor(&descriptor_path, message))?;

        for file in &files {
            self.render_file(file, &data)?;
        }
        info!("Rendered {} template files in {}", files.len(), dir.display());

        if let Some(actions) = &descriptor.finished {
            let ctx = FinishContext::new(dir, &data);
            run_actions(&ctx, &self.engine, actions)?;
        }

        Ok(data)
    }

    /// Materialize prompts, injecting known defaults when presets are on
    fn questions(
        &self,
        descriptor: &TemplateDescriptor,
        dir: &Path,
        defaults: &AnswerSet,
    ) -> Result<Vec<Question>> {
        let mut questions = descriptor
            .build_prompts(&self.engine, dir)
            .map_err(|message| {
                ScaffoldError::descriptor(&self.settings.descriptor_path(dir), message)
            })?;

        if descriptor.save_preset.is_enabled() {
            for q in questions.iter_mut().filter(|q| !q.has_default()) {
                if let Some(value) = defaults.get(&q.name) {
                    q.default = Some(value.clone());
                }
            }
        }
        Ok(questions)
    }

    /// Write the rendered output beside the source, then drop the source
    fn render_file(&self, file: &TemplateFile, data: &AnswerSet) -> Result<()> {
        let src = &file.source;
        let fail = |message: String| ScaffoldError::render(src, message);

        let text = std::fs::read_to_string(src).map_err(|e| fail(e.to_string()))?;
        let rendered = self
            .engine
            .render_template(&text, data)
            .map_err(|e| fail(e.to_string()))?;

        let parent = file.destination.parent().unwrap_or_else(|| Path::new("."));
        let permissions = std::fs::metadata(src)
            .map_err(|e| fail(e.to_string()))?
            .permissions();

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| fail(e.to_string()))?;
        tmp.write_all(rendered.as_bytes())
            .and_then(|_| tmp.as_file().set_permissions(permissions))
            .map_err(|e| fail(e.to_string()))?;
        tmp.persist(&file.destination)
            .map_err(|e| fail(e.error.to_string()))?;

        if file.destination != *src {
            std::fs::remove_file(src).map_err(|e| fail(e.to_string()))?;
        }

        debug!("Rendered {} -> {}", src.display(), file.destination.display());
        Ok(())
    }
}
