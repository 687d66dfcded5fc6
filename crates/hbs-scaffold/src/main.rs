//! hbs-scaffold - Project scaffolding from handlebars template repositories

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use scaffolder_core::answers::{self, AnswerSet};
use scaffolder_core::tui::{CreateArgs, RenderArgs};
use scaffolder_core::{CloneOptions, PresetStore, ProductConfig, Settings};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// hbs-scaffold product configuration
#[derive(Clone)]
pub struct HbsConfig;

impl ProductConfig for HbsConfig {
    fn name(&self) -> &'static str {
        "hbs-scaffold"
    }

    fn display_name(&self) -> &'static str {
        "hbs-scaffold"
    }

    fn preset_dir_env(&self) -> &'static str {
        "HBS_SCAFFOLD_PRESET_DIR"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding projects from handlebars template repositories"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install hbs-scaffold --force"
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push("Open README.md to get started".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "hbs-scaffold")]
#[command(about = "CLI for scaffolding projects from handlebars template repositories")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from a template repository
    Create(CliCreateArgs),
    /// Render the templates of an existing directory in place
    Render(CliRenderArgs),
    /// Inspect or delete saved answers for a template
    #[command(subcommand)]
    Preset(PresetCommand),
}

/// Answers supplied on the command line
#[derive(ClapArgs, Debug, Default)]
pub struct DataArgs {
    /// Answer a prompt up front (repeatable, e.g. -d name=demo -d port=8080)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE")]
    pub data: Vec<String>,

    /// Answers as a JSON object, applied before --data
    #[arg(long = "data-json", value_name = "JSON")]
    pub data_json: Option<String>,
}

impl DataArgs {
    fn answers(&self) -> Result<AnswerSet> {
        let mut set = match &self.data_json {
            Some(json) => serde_json::from_str::<AnswerSet>(json)
                .context("--data-json must be a JSON object")?,
            None => AnswerSet::new(),
        };
        let pairs = answers::from_pairs(self.data.iter().map(String::as_str))
            .map_err(anyhow::Error::msg)?;
        answers::deep_merge(&mut set, pairs);
        Ok(set)
    }
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Template repository (git URL or local path)
    pub source: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Branch or tag to clone
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Shallow clone depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Directory holding saved presets
    #[arg(long = "preset-dir", env = "HBS_SCAFFOLD_PRESET_DIR")]
    pub preset_dir: Option<PathBuf>,

    /// Accept every default (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl TryFrom<CliCreateArgs> for CreateArgs {
    type Error = anyhow::Error;

    fn try_from(args: CliCreateArgs) -> Result<Self> {
        Ok(CreateArgs {
            data: args.data.answers()?,
            source: args.source,
            directory: args.directory,
            preset_dir: args.preset_dir,
            clone: CloneOptions {
                depth: args.depth,
                branch: args.branch,
            },
            yes: args.yes,
        })
    }
}

#[derive(Parser, Debug)]
pub struct CliRenderArgs {
    /// Directory containing templates
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    #[command(flatten)]
    pub data: DataArgs,

    /// Accept every default (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// Print where the preset for a template is stored
    Path(PresetArgs),
    /// Print the saved answers for a template
    Show(PresetArgs),
    /// Delete the saved answers for a template
    Remove(PresetArgs),
}

#[derive(Parser, Debug)]
pub struct PresetArgs {
    /// Template repository address, exactly as passed to `create`
    pub source: String,

    /// Directory holding saved presets
    #[arg(long = "preset-dir", env = "HBS_SCAFFOLD_PRESET_DIR")]
    pub preset_dir: Option<PathBuf>,
}

impl PresetArgs {
    fn store(&self, config: &HbsConfig) -> PresetStore {
        let mut settings = Settings::from_config(config, CLI_VERSION);
        if let Some(dir) = &self.preset_dir {
            settings = settings.with_preset_dir(dir);
        }
        PresetStore::from_settings(&settings)
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Prompts own stdout; keep the default log quiet
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_preset(config: &HbsConfig, command: PresetCommand) -> Result<()> {
    match command {
        PresetCommand::Path(args) => {
            println!("{}", args.store(config).path_for(&args.source).display());
        }
        PresetCommand::Show(args) => {
            let preset = args.store(config).read(&args.source);
            if preset.is_empty() {
                eprintln!("{}", format!("No saved answers for {}", args.source).yellow());
            } else {
                println!("{}", serde_json::to_string_pretty(&preset)?);
            }
        }
        PresetCommand::Remove(args) => {
            if args.store(config).remove(&args.source)? {
                println!("{} {}", "Removed saved answers for".green(), args.source);
            } else {
                println!("No saved answers for {}", args.source);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);
    let config = HbsConfig;

    let result = match args.command {
        Some(Command::Create(create_args)) => {
            let create_args = CreateArgs::try_from(create_args)?;
            scaffolder_core::run(&config, create_args, CLI_VERSION).await
        }
        Some(Command::Render(render_args)) => {
            let render_args = RenderArgs {
                data: render_args.data.answers()?,
                directory: render_args.directory,
                yes: render_args.yes,
            };
            scaffolder_core::tui::run_render(&config, render_args, CLI_VERSION)
        }
        Some(Command::Preset(command)) => run_preset(&config, command),
        None => {
            // No subcommand provided, default to create behavior (interactive mode)
            scaffolder_core::run(&config, CreateArgs::default(), CLI_VERSION).await
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
