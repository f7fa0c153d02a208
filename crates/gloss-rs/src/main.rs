//! Command-line renderer for validation errors.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use gloss_rs::{
    ConfigStore, ErrorHandler, GlossConfig, HandleOptions, ModelDescriptor, Outcome,
    init_logging,
};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Command-line options for the gloss renderer.
#[derive(Parser)]
#[command(name = "gloss", version)]
struct Cli {
    /// Optional path to a gloss.json5 config file; layered discovery otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a raw validation error for a model
    Render {
        /// JSON5 model descriptor: { name, collection?, schema }
        #[arg(long)]
        model: PathBuf,
        /// JSON file holding the raw validation error
        #[arg(long)]
        error: PathBuf,
        /// Template package to render with
        #[arg(long)]
        package: Option<String>,
        /// Failure kind to leave out (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },
    /// Print the effective options after config loading
    Config,
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.options)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Render {
            model,
            error,
            package,
            exclude,
        } => {
            let store = ConfigStore::from_config(config).context("invalid config")?;
            let handler = ErrorHandler::new(store);
            let model = load_model(&model)?;
            let error = load_error(&error)?;
            let mut options = HandleOptions::new();
            if let Some(package) = package {
                options = options.package(package);
            }
            for kind in exclude {
                options = options.exclude(kind);
            }
            render(&handler, &model, &error, &options)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GlossConfig> {
    if let Some(path) = path {
        info!("loading config from path: {}", path.display());
        return GlossConfig::load_from_path(path).context("failed to load config");
    }
    let cwd = std::env::current_dir().context("cwd")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let layered = GlossConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

fn load_model(path: &Path) -> anyhow::Result<ModelDescriptor> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read model {}", path.display()))?;
    json5::from_str(&contents).with_context(|| format!("invalid model {}", path.display()))
}

fn load_error(path: &Path) -> anyhow::Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read error {}", path.display()))?;
    let error: Value = serde_json::from_str(&contents)
        .with_context(|| format!("invalid error JSON {}", path.display()))?;
    if error.is_null() {
        bail!("error file {} holds null", path.display());
    }
    Ok(error)
}

fn render(
    handler: &ErrorHandler,
    model: &ModelDescriptor,
    error: &Value,
    options: &HandleOptions,
) -> anyhow::Result<ExitCode> {
    let outcome = handler
        .handle_validation_error(model, error, options)
        .context("failed to render validation error")?;
    let printed = match outcome {
        Outcome::Friendly(friendly) => friendly.to_value(),
        Outcome::Unhandled(original) => original,
        Outcome::NoError => {
            debug!("no error left to report");
            return Ok(ExitCode::SUCCESS);
        }
    };
    println!("{}", serde_json::to_string_pretty(&printed)?);
    Ok(ExitCode::FAILURE)
}
