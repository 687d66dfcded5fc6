//! Charm-style CLI prompts using cliclack

use crate::answers::AnswerSet;
use crate::clone::{self, CloneOptions, GitCloner};
use crate::config::{Question, QuestionKind};
use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use crate::prompt::{default_answer, DefaultsPrompter, Prompter};
use crate::scaffold::Scaffolder;
use crate::settings::Settings;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Template repository (URL or local path)
    pub source: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Answers supplied up front; they beat saved presets
    pub data: AnswerSet,

    /// Preset directory override
    pub preset_dir: Option<PathBuf>,

    /// Clone options passed to git
    pub clone: CloneOptions,

    /// Accept every default (non-interactive mode)
    pub yes: bool,
}

/// CLI arguments for rendering an existing directory
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub directory: PathBuf,
    pub data: AnswerSet,
    pub yes: bool,
}

/// Asks descriptor questions with cliclack
#[derive(Debug, Default)]
pub struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn ask(&mut self, questions: &[Question]) -> crate::Result<AnswerSet> {
        let mut answers = AnswerSet::new();
        for question in questions {
            let value = ask_one(question).map_err(|e| ScaffoldError::prompt(e.to_string()))?;
            answers.insert(question.name.clone(), value);
        }
        Ok(answers)
    }
}

fn ask_one(q: &Question) -> std::io::Result<Value> {
    let default = default_answer(q);
    match q.kind {
        QuestionKind::Input => {
            let mut input = cliclack::input(q.message_text()).required(false);
            if let Some(placeholder) = &q.placeholder {
                input = input.placeholder(placeholder);
            }
            let default_text = match &default {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !default_text.is_empty() {
                input = input.default_input(&default_text);
            }
            let text: String = input.interact()?;
            Ok(typed_like(&text, &default))
        }
        QuestionKind::Confirm => {
            let initial = default.as_bool().unwrap_or(false);
            Ok(Value::Bool(
                cliclack::confirm(q.message_text())
                    .initial_value(initial)
                    .interact()?,
            ))
        }
        QuestionKind::Select => {
            let mut select = cliclack::select(q.message_text());
            for choice in &q.choices {
                select = select.item(choice.value().to_string(), choice.label(), choice.hint());
            }
            if let Some(initial) = default.as_str() {
                if q.choices.iter().any(|c| c.value() == initial) {
                    select = select.initial_value(initial.to_string());
                }
            }
            Ok(Value::String(select.interact()?))
        }
        QuestionKind::Multiselect => {
            let mut multi = cliclack::multiselect(q.message_text()).required(false);
            for choice in &q.choices {
                multi = multi.item(choice.value().to_string(), choice.label(), choice.hint());
            }
            let initial: Vec<String> = default
                .as_array()
                .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default();
            if !initial.is_empty() {
                multi = multi.initial_values(initial);
            }
            let selected: Vec<String> = multi.interact()?;
            Ok(Value::Array(selected.into_iter().map(Value::String).collect()))
        }
    }
}

/// Keep numbers and booleans typed when the default was
fn typed_like(text: &str, default: &Value) -> Value {
    match default {
        Value::Number(_) | Value::Bool(_) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        _ => Value::String(text.to_string()),
    }
}

/// Run the create flow with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Template source
    let source = select_source(&args)?;

    // Step 2: Project directory
    let project_dir = select_directory(&args, &source)?;

    // Step 3: Settings and preset location
    let mut settings = Settings::from_config(config, cli_version);
    if let Some(dir) = &args.preset_dir {
        settings = settings.with_preset_dir(dir);
    }
    let cloner = GitCloner::new(args.clone.clone());
    let mut prompter = select_prompter(args.yes);
    let mut scaffolder = Scaffolder::new(settings, cloner, prompter.as_mut());

    let preset_path = scaffolder.store().path_for(&source);
    if preset_path.exists() {
        cliclack::log::info(format!("Using saved answers from {}", preset_path.display()))?;
    }

    // Step 4: Clone, prompt, render, save preset
    cliclack::log::step(format!("Cloning {}", source))?;

    let answers = scaffolder
        .run(&source, &project_dir, &args.data)
        .await
        .with_context(|| format!("Failed to scaffold {}", source))?;

    cliclack::log::success(format!(
        "Created project in {} ({} answers)",
        project_dir.display(),
        answers.len()
    ))?;
    if preset_path.exists() {
        cliclack::log::info(format!("Answers saved to {}", preset_path.display()))?;
    }

    // Step 5: Show next steps
    print_next_steps(config, &project_dir)?;

    Ok(())
}

/// Render an existing directory in place (no clone, no presets)
pub fn run_render<C: ProductConfig>(config: &C, args: RenderArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    if !args.directory.is_dir() {
        anyhow::bail!("Directory does not exist: {}", args.directory.display());
    }

    let settings = Settings::from_config(config, cli_version);
    let mut prompter = select_prompter(args.yes);
    let mut scaffolder = Scaffolder::new(settings, GitCloner::default(), prompter.as_mut());

    let answers = scaffolder
        .render_in_place(&args.directory, &args.data)
        .with_context(|| format!("Failed to render {}", args.directory.display()))?;

    cliclack::outro(format!(
        "Rendered {} with {} answers",
        args.directory.display(),
        answers.len()
    ))?;
    Ok(())
}

fn select_prompter(yes: bool) -> Box<dyn Prompter> {
    if yes {
        Box::new(DefaultsPrompter)
    } else {
        Box::new(CliclackPrompter)
    }
}

fn select_source(args: &CreateArgs) -> Result<String> {
    if let Some(source) = &args.source {
        cliclack::log::info(format!("Template: {}", source))?;
        return Ok(source.clone());
    }
    if args.yes {
        anyhow::bail!("A template repository is required in non-interactive mode.");
    }

    let source: String = cliclack::input("Template repository")
        .placeholder("https://github.com/user/template.git")
        .validate(|input: &String| {
            if clone::is_valid_repo_address(input) {
                Ok(())
            } else {
                Err("Enter a git URL or an existing local path")
            }
        })
        .interact()?;
    Ok(source)
}

fn select_directory(args: &CreateArgs, source: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let suggested = clone::repo_name(source).unwrap_or_else(|| "my-project".to_string());

    // Use --directory flag if provided
    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir.join(&suggested)
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(&suggested)
            .default_input(&suggested)
            .interact()?;
        let p = PathBuf::from(&input);
        if p.is_absolute() {
            p
        } else {
            current_dir.join(p)
        }
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // git refuses to clone into a non-empty directory
    if path.is_dir() {
        let count = std::fs::read_dir(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .count();
        if count > 0 {
            anyhow::bail!(
                "Directory {} already has {} items; choose an empty or new directory",
                path.display(),
                count
            );
        }
    }

    Ok(path)
}

fn print_next_steps<C: ProductConfig>(config: &C, project_dir: &Path) -> Result<()> {
    let steps = config.next_steps(project_dir);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
