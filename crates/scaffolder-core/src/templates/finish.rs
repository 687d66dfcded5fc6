//! Post-render hook: filesystem and data helpers handed to `finished` actions

use crate::answers::{self, AnswerSet};
use crate::config::descriptor::{is_confined, FinishAction};
use crate::error::{Result, ScaffoldError};
use crate::templates::engine::TemplateEngine;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem operations confined to the generated project
#[derive(Debug, Clone)]
pub struct FsUtils {
    root: PathBuf,
}

impl FsUtils {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a project-relative path, rejecting anything that escapes the root
    pub fn resolve(&self, rel: &str) -> std::io::Result<PathBuf> {
        if !is_confined(rel) {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("path '{}' escapes the project directory", rel),
            ));
        }
        Ok(self.root.join(rel))
    }

    /// Create or replace a file, creating parent directories
    pub fn write(&self, rel: &str, content: &str) -> std::io::Result<()> {
        let path = self.resolve(rel)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    /// Remove a file or directory tree; missing paths are fine
    pub fn remove(&self, rel: &str) -> std::io::Result<()> {
        let path = self.resolve(rel)?;
        let result = match std::fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&path),
            Ok(_) => std::fs::remove_file(&path),
            Err(e) => Err(e),
        };
        match result {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Move a file or directory, creating the target's parent directories
    pub fn move_path(&self, from: &str, to: &str) -> std::io::Result<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(from, to)
    }

    pub fn create_dir(&self, rel: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(self.resolve(rel)?)
    }
}

/// Read-only helpers over the final answers
#[derive(Debug, Clone, Copy)]
pub struct DataUtils<'a> {
    data: &'a AnswerSet,
}

impl<'a> DataUtils<'a> {
    pub fn new(data: &'a AnswerSet) -> Self {
        Self { data }
    }

    /// Dotted lookup (`author.name`)
    pub fn get(&self, path: &str) -> Option<&'a Value> {
        answers::get_path(self.data, path)
    }

    pub fn is_truthy(&self, path: &str) -> bool {
        self.get(path).is_some_and(answers::is_truthy)
    }

    /// Whether an action's `when` / `unless` keys let it run
    pub fn allows(&self, action: &FinishAction) -> bool {
        let (when, unless) = action.conditions();
        when.map_or(true, |key| self.is_truthy(key)) && !unless.is_some_and(|key| self.is_truthy(key))
    }
}

/// Everything a `finished` hook can see
pub struct FinishContext<'a> {
    pub dir: &'a Path,
    pub data: &'a AnswerSet,
    pub fs: FsUtils,
}

impl<'a> FinishContext<'a> {
    pub fn new(dir: &'a Path, data: &'a AnswerSet) -> Self {
        Self {
            dir,
            data,
            fs: FsUtils::new(dir),
        }
    }

    pub fn data_utils(&self) -> DataUtils<'a> {
        DataUtils::new(self.data)
    }
}

/// Run descriptor actions in order; the first failure stops the run
pub fn run_actions(
    ctx: &FinishContext<'_>,
    engine: &TemplateEngine,
    actions: &[FinishAction],
) -> Result<()> {
    debug!("Running {} finished actions in {}", actions.len(), ctx.dir.display());
    let data = ctx.data_utils();
    for action in actions {
        if !data.allows(action) {
            debug!("Skipping inactive {} action", action.name());
            continue;
        }
        run_action(ctx, engine, action)?;
    }
    Ok(())
}

fn run_action(ctx: &FinishContext<'_>, engine: &TemplateEngine, action: &FinishAction) -> Result<()> {
    let name = action.name();
    let render = |text: &str| {
        engine
            .render_template(text, ctx.data)
            .map_err(|e| ScaffoldError::finish(name, e.to_string()))
    };
    let io = |e: std::io::Error| ScaffoldError::finish(name, e.to_string());

    match action {
        FinishAction::Remove { path, .. } => {
            let path = render(path)?;
            debug!("finished: remove {}", path);
            ctx.fs.remove(&path).map_err(io)
        }
        FinishAction::Move { from, to, .. } => {
            let (from, to) = (render(from)?, render(to)?);
            debug!("finished: move {} -> {}", from, to);
            ctx.fs.move_path(&from, &to).map_err(io)
        }
        FinishAction::Mkdir { path, .. } => {
            let path = render(path)?;
            debug!("finished: mkdir {}", path);
            ctx.fs.create_dir(&path).map_err(io)
        }
        FinishAction::Write { path, content, .. } => {
            let path = render(path)?;
            let content = render(content)?;
            debug!("finished: write {}", path);
            ctx.fs.write(&path, &content).map_err(io)
        }
    }
}
