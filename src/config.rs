//! This module provides functionality for loading and handling the application's configuration.
//!
//! It defines the `AskPdfConfig` struct, which holds the endpoint wiring and
//! generation parameters, a `load_config` function to load the configuration from
//! a YAML file, and environment-variable overrides for credentials so an API key
//! never has to live in the config file itself.
//!
//! # Examples
//!
//! Loading the configuration from a file:
//!
//! ```no_run
//! use askpdf::config::{AskPdfConfig, load_config};
//!
//! let config: AskPdfConfig = load_config("/path/to/config.yaml").unwrap();
//! println!("{:?}", config);
//! ```

use serde::{Deserialize, Serialize};
use std::{env, error::Error, fs, path::Path};

use tracing::*;

/// Instruction-following system prompt sent ahead of every completion request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Below is an instruction that describes a task. \
Write a response that appropriately completes the request.";

/// Represents the application's configuration.
///
/// This struct holds everything needed to reach the remote chat-completion and
/// embedding endpoints plus the local indexing parameters. It can be constructed
/// by loading a YAML configuration file using the `load_config` function, or via
/// [`AskPdfConfig::default`] which encodes the stock endpoint wiring.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct AskPdfConfig {
    /// The API key used to authenticate requests against both endpoints.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the chat-completion API.
    pub api_base: String,

    /// Base URL of the embedding API.
    pub embedding_api_base: String,

    /// The name of the model used for generating responses.
    pub model: String,

    /// The name of the model used for computing embeddings.
    pub embedding_model: String,

    // Upper bound on generated tokens per response.
    #[serde(default = "default_max_response_tokens")]
    pub max_response_tokens: u16,

    // Token budget for a single document chunk.
    #[serde(default = "default_chunk_max_tokens")]
    pub chunk_max_tokens: usize,

    // Number of nearest chunks retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    // System prompt steering the assistant.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_max_response_tokens() -> u16 {
    256
}

fn default_chunk_max_tokens() -> usize {
    512
}

fn default_top_k() -> usize {
    3
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for AskPdfConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://text.octoai.run/v1".to_string(),
            embedding_api_base: "https://text.octoai.run/v1".to_string(),
            model: "llama-2-70b-chat-fp16".to_string(),
            embedding_model: "thenlper/gte-large".to_string(),
            max_response_tokens: default_max_response_tokens(),
            chunk_max_tokens: default_chunk_max_tokens(),
            top_k: default_top_k(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl AskPdfConfig {
    /// Apply environment-variable overrides on top of the loaded values.
    ///
    /// Credentials are expected to arrive through the environment (typically a
    /// `.env` file loaded at startup) rather than the YAML file. Recognized
    /// variables:
    ///
    /// - `ASKPDF_API_KEY` (falling back to `OCTOAI_API_TOKEN`)
    /// - `ASKPDF_API_BASE`
    /// - `ASKPDF_EMBEDDING_API_BASE`
    /// - `ASKPDF_MODEL`
    /// - `ASKPDF_EMBEDDING_MODEL`
    pub fn apply_env(mut self) -> Self {
        if let Ok(key) = env::var("ASKPDF_API_KEY") {
            self.api_key = key;
        } else if let Ok(key) = env::var("OCTOAI_API_TOKEN") {
            self.api_key = key;
        }

        if let Ok(base) = env::var("ASKPDF_API_BASE") {
            self.api_base = base;
        }

        if let Ok(base) = env::var("ASKPDF_EMBEDDING_API_BASE") {
            self.embedding_api_base = base;
        }

        if let Ok(model) = env::var("ASKPDF_MODEL") {
            self.model = model;
        }

        if let Ok(model) = env::var("ASKPDF_EMBEDDING_MODEL") {
            self.embedding_model = model;
        }

        self
    }
}

/// Loads the application's configuration from a YAML file.
///
/// This function reads the file at the given path, parses it as YAML, and
/// constructs an `AskPdfConfig` struct from it.
///
/// # Parameters
///
/// - `file`: The path to the YAML configuration file.
///
/// # Returns
///
/// - `Ok(AskPdfConfig)`: The loaded configuration.
/// - `Err(Box<dyn Error>)`: An error occurred while reading the file or parsing the YAML.
pub fn load_config(file: &str) -> Result<AskPdfConfig, Box<dyn Error>> {
    debug!("Loading config from: {}", file);
    let content = fs::read_to_string(file)?;
    let config: AskPdfConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Resolve the effective configuration for a run.
///
/// Reads `config.yaml` at `config_path` when it exists, otherwise starts from
/// the stock defaults; environment overrides are applied in either case.
pub fn resolve_config(config_path: &Path) -> Result<AskPdfConfig, Box<dyn Error>> {
    let config = if config_path.is_file() {
        load_config(config_path.to_str().ok_or("Config path is not valid UTF-8")?)?
    } else {
        debug!(
            "No config file at {}, using defaults",
            config_path.display()
        );
        AskPdfConfig::default()
    };

    Ok(config.apply_env())
}
