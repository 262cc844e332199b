//! This module defines the command-line interface for the application using `clap`.
//!
//! It provides a `Cli` struct that represents the parsed command-line arguments,
//! and a `Commands` enum that represents the available subcommands and their
//! options. Invoking the binary with no arguments at all is equivalent to
//! `askpdf chat`, answering questions about `file.pdf` next to the program.

use clap::{Parser, Subcommand};

/// Represents the parsed command-line arguments.
///
/// This struct is constructed by parsing the command-line arguments using `clap`.
/// The subcommand is optional; its absence runs the default chat session.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true, color = clap::ColorChoice::Always)]
pub struct Cli {
    /// The parsed subcommand and its options.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Represents the available subcommands and their options.
#[derive(Subcommand, Debug)]
#[command(about, long_about = None, color = clap::ColorChoice::Always)]
pub enum Commands {
    /// The 'chat' subcommand: interactively answer questions about a document.
    ///
    /// If the file is not provided on the command line, `file.pdf` in the
    /// program's own directory is used.
    #[clap(name = "chat", alias = "c")]
    Chat {
        /// The document to ask about. Defaults to `file.pdf`.
        file: Option<String>,
    },

    /// The 'init' subcommand, which takes no arguments and is used for initialization.
    ///
    /// When invoked, this subcommand writes a default `config.yaml` next to
    /// the program so endpoints and models can be adjusted.
    Init,
}
