//! Template descriptor types and parsing
//!
//! A descriptor is an optional `scaffold.config.yaml` at the template root:
//!
//! ```yaml
//! version: 0.1.0
//! save_preset: [author, license]
//! prompts:
//!   - name: name
//!     message: Project name
//!     default: "{{dir_name}}"
//!   - name: license
//!     type: select
//!     choices: [MIT, Apache-2.0]
//! transform:
//!   slug: "{{kebab name}}"
//! finished:
//!   - action: remove
//!     path: docker
//!     unless: docker
//! ```

use crate::answers::{self, AnswerSet};
use crate::templates::engine::TemplateEngine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::path::{Component, Path};

/// Which collected answers are kept as a preset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavePresetPolicy {
    /// `true` keeps everything, `false` disables presets
    All(bool),
    /// Only these top-level keys are kept
    Keys(Vec<String>),
}

impl Default for SavePresetPolicy {
    fn default() -> Self {
        Self::All(true)
    }
}

impl SavePresetPolicy {
    /// Whether presets are loaded and saved at all
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::All(enabled) => *enabled,
            Self::Keys(_) => true,
        }
    }

    /// Reduce an answer set to what the policy keeps
    pub fn apply(&self, answers: &AnswerSet) -> AnswerSet {
        match self {
            Self::All(true) => answers.clone(),
            Self::All(false) => AnswerSet::new(),
            Self::Keys(keys) => answers::pick_keys(answers, keys),
        }
    }
}

/// Kind of interactive question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    Input,
    Confirm,
    Select,
    Multiselect,
}

/// A choice for select questions: either `MIT` or `{ value: mit, label: MIT License }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Plain(String),
    Labeled {
        value: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        hint: Option<String>,
    },
}

impl Choice {
    pub fn value(&self) -> &str {
        match self {
            Choice::Plain(v) => v,
            Choice::Labeled { value, .. } => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::Plain(v) => v,
            Choice::Labeled { value, label, .. } => label.as_deref().unwrap_or(value),
        }
    }

    pub fn hint(&self) -> &str {
        match self {
            Choice::Plain(_) => "",
            Choice::Labeled { hint, .. } => hint.as_deref().unwrap_or(""),
        }
    }
}

/// A single prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Answer key
    pub name: String,

    /// Prompt text (falls back to `name`)
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: QuestionKind,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default)]
    pub placeholder: Option<String>,
}

impl Question {
    /// Input question with no default
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: None,
            kind: QuestionKind::Input,
            default: None,
            choices: Vec::new(),
            placeholder: None,
        }
    }

    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.name)
    }

    /// True when the template author set a default (null counts as unset)
    pub fn has_default(&self) -> bool {
        matches!(&self.default, Some(v) if !v.is_null())
    }
}

/// Post-render action on the generated tree
///
/// Paths are relative to the destination and rendered against the final
/// answers. `when` / `unless` name an answer key (dotted paths allowed) whose
/// truthiness gates the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum FinishAction {
    Remove {
        path: String,
        #[serde(default)]
        when: Option<String>,
        #[serde(default)]
        unless: Option<String>,
    },
    Move {
        from: String,
        to: String,
        #[serde(default)]
        when: Option<String>,
        #[serde(default)]
        unless: Option<String>,
    },
    Mkdir {
        path: String,
        #[serde(default)]
        when: Option<String>,
        #[serde(default)]
        unless: Option<String>,
    },
    Write {
        path: String,
        content: String,
        #[serde(default)]
        when: Option<String>,
        #[serde(default)]
        unless: Option<String>,
    },
}

impl FinishAction {
    pub fn name(&self) -> &'static str {
        match self {
            FinishAction::Remove { .. } => "remove",
            FinishAction::Move { .. } => "move",
            FinishAction::Mkdir { .. } => "mkdir",
            FinishAction::Write { .. } => "write",
        }
    }

    /// Raw (unrendered) paths this action touches
    pub fn paths(&self) -> Vec<&str> {
        match self {
            FinishAction::Remove { path, .. }
            | FinishAction::Mkdir { path, .. }
            | FinishAction::Write { path, .. } => vec![path.as_str()],
            FinishAction::Move { from, to, .. } => vec![from.as_str(), to.as_str()],
        }
    }

    /// The `when` / `unless` answer keys gating this action
    pub fn conditions(&self) -> (Option<&str>, Option<&str>) {
        match self {
            FinishAction::Remove { when, unless, .. }
            | FinishAction::Move { when, unless, .. }
            | FinishAction::Mkdir { when, unless, .. }
            | FinishAction::Write { when, unless, .. } => (when.as_deref(), unless.as_deref()),
        }
    }
}

/// Per-template configuration
///
/// Every field is optional; absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDescriptor {
    /// Questions asked before rendering
    pub prompts: Option<Vec<Question>>,

    /// `key -> expression` entries applied in order to the collected answers
    pub transform: Option<Map<String, Value>>,

    /// Actions run once every template file is rendered
    pub finished: Option<Vec<FinishAction>>,

    #[serde(alias = "savePreset")]
    pub save_preset: SavePresetPolicy,

    /// Minimum CLI version the template was written for
    pub version: Option<String>,
}

impl Default for TemplateDescriptor {
    fn default() -> Self {
        Self {
            prompts: None,
            transform: None,
            finished: None,
            save_preset: SavePresetPolicy::default(),
            version: None,
        }
    }
}

impl TemplateDescriptor {
    /// Parse descriptor YAML
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Check the descriptor is usable before anything runs
    pub fn validate(&self) -> Result<(), String> {
        if let Some(prompts) = &self.prompts {
            let mut seen = HashSet::new();
            for q in prompts {
                if q.name.trim().is_empty() {
                    return Err("prompt with an empty name".to_string());
                }
                if !seen.insert(q.name.as_str()) {
                    return Err(format!("duplicate prompt name '{}'", q.name));
                }
                if matches!(q.kind, QuestionKind::Select | QuestionKind::Multiselect)
                    && q.choices.is_empty()
                {
                    return Err(format!("prompt '{}' needs at least one choice", q.name));
                }
                for text in [q.message.as_deref(), q.placeholder.as_deref()]
                    .into_iter()
                    .flatten()
                {
                    TemplateEngine::check(text)
                        .map_err(|e| format!("prompt '{}': {}", q.name, e))?;
                }
            }
        }

        if let Some(transform) = &self.transform {
            for (key, expr) in transform {
                if key.trim().is_empty() || key.split('.').any(str::is_empty) {
                    return Err(format!("invalid transform key '{}'", key));
                }
                if let Value::String(expr) = expr {
                    TemplateEngine::check(expr)
                        .map_err(|e| format!("transform '{}': {}", key, e))?;
                }
            }
        }

        if let Some(finished) = &self.finished {
            for action in finished {
                for path in action.paths() {
                    if !is_confined(path) {
                        return Err(format!(
                            "{} path '{}' must be relative and stay inside the project",
                            action.name(),
                            path
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn has_prompts(&self) -> bool {
        self.prompts.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Materialize the questions for a destination directory
    ///
    /// Message, placeholder and string defaults may reference `{{dir}}` and
    /// `{{dir_name}}`.
    pub fn build_prompts(
        &self,
        engine: &TemplateEngine,
        dir: &Path,
    ) -> Result<Vec<Question>, String> {
        let Some(prompts) = &self.prompts else {
            return Ok(Vec::new());
        };

        let ctx = json!({
            "dir": dir.display().to_string(),
            "dir_name": dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(),
        });
        let render = |text: &str| {
            engine
                .render_template(text, &ctx)
                .map_err(|e| e.to_string())
        };

        prompts
            .iter()
            .map(|q| {
                let mut q = q.clone();
                if let Some(message) = &q.message {
                    q.message = Some(render(message)?);
                }
                if let Some(placeholder) = &q.placeholder {
                    q.placeholder = Some(render(placeholder)?);
                }
                if let Some(Value::String(default)) = &q.default {
                    q.default = Some(Value::String(render(default)?));
                }
                Ok::<Question, String>(q)
            })
            .collect()
    }

    /// Map collected answers to the final render data
    ///
    /// String entries are rendered against the data as it stands (so later
    /// entries see earlier ones); other values are inserted as-is.
    pub fn apply_transform(
        &self,
        engine: &TemplateEngine,
        mut data: AnswerSet,
    ) -> Result<AnswerSet, String> {
        let Some(transform) = &self.transform else {
            return Ok(data);
        };
        for (key, expr) in transform {
            let value = match expr {
                Value::String(text) => Value::String(
                    engine
                        .render_template(text, &data)
                        .map_err(|e| format!("transform '{}': {}", key, e))?,
                ),
                other => other.clone(),
            };
            answers::set_path(&mut data, key, value);
        }
        Ok(data)
    }
}

/// Relative path without `..`, root or prefix components
pub(crate) fn is_confined(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
