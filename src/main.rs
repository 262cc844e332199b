//! Main module for the askpdf CLI application.
//!
//! This module provides the main function and auxiliary functionalities for
//! the CLI application. It handles command parsing, configuration loading, and
//! initialization, as well as invoking the interactive session.
//!
//! # Examples
//!
//! Answering questions about `file.pdf` next to the binary:
//!
//! ```sh
//! askpdf
//! ```
//!
//! Initializing the application's configuration:
//!
//! ```sh
//! askpdf init
//! ```

mod api;
mod bootstrap;
mod chunker;
mod commands;
mod config;
mod document;
mod engine;
mod session;
mod vector_store;

use clap::Parser;
use std::{error::Error, fs};
use tracing::debug;

use crate::bootstrap::{DEFAULT_DOCUMENT, Workspace};
use crate::session::SessionOutcome;

fn main() {
    bootstrap::init_tracing();

    let runtime = tokio::runtime::Runtime::new().unwrap();

    // Errors from the document reader, index builder or query engine
    // surface here with a stack trace.
    let outcome = runtime.block_on(run()).unwrap();

    if let Some(SessionOutcome::Terminated) = outcome {
        std::process::exit(1);
    }
}

/// Main asynchronous function of the askpdf CLI application.
///
/// Loads environment variables, parses command-line arguments, and executes
/// the appropriate command. A bare invocation runs the chat session against
/// `file.pdf`.
///
/// # Errors
///
/// Returns an error if there is an issue with the workspace, the
/// configuration, or the session itself.
async fn run() -> Result<Option<SessionOutcome>, Box<dyn Error>> {
    // Credentials may live in a local .env file; absence is fine.
    let _ = dotenvy::dotenv();

    let cli = commands::Cli::parse();

    match cli.command {
        Some(commands::Commands::Init) => {
            init()?;
            Ok(None)
        }
        Some(commands::Commands::Chat { file }) => {
            let file = file.unwrap_or_else(|| DEFAULT_DOCUMENT.to_string());
            let outcome = chat(&file).await?;
            Ok(Some(outcome))
        }
        None => {
            let outcome = chat(DEFAULT_DOCUMENT).await?;
            Ok(Some(outcome))
        }
    }
}

/// Bootstrap the workspace and run the interactive session for one document.
async fn chat(file: &str) -> Result<SessionOutcome, Box<dyn Error>> {
    let workspace = Workspace::discover(file)?;
    workspace.ensure_storage_dir()?;
    workspace.validate_document()?;

    let config = config::resolve_config(&workspace.config_path())?;
    debug!("Config loaded: {:?}", config);

    session::run_session(&workspace, config).await
}

/// Initializes the application's configuration.
///
/// Writes a default `config.yaml` next to the program so the endpoints,
/// models and generation parameters can be edited. Refuses to overwrite an
/// existing file.
///
/// # Errors
///
/// Returns an error if there is an issue determining the workspace or writing
/// the file, or if the configuration cannot be serialized to YAML.
fn init() -> Result<(), Box<dyn Error>> {
    let workspace = Workspace::discover(DEFAULT_DOCUMENT)?;
    let config_path = workspace.config_path();

    if config_path.exists() {
        return Err(format!("Config already exists at {}", config_path.display()).into());
    }

    let config = config::AskPdfConfig::default();
    let config_yaml = serde_yaml::to_string(&config)?;
    fs::write(&config_path, config_yaml)?;

    println!("Wrote default config to {}", config_path.display());
    Ok(())
}
