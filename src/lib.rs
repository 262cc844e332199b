//! # askpdf (library root)
//!
//! This crate provides the plumbing for the **askpdf** CLI: load one PDF,
//! build a semantic index over its text with a hosted embedding endpoint, and
//! answer free-form questions about it interactively from the terminal.
//!
//! - Process bootstrap and filesystem layout (`bootstrap`).
//! - Configuration & environment overrides (`config`).
//! - CLI parsing (`commands`).
//! - PDF text extraction (`document`) and token-budgeted chunking (`chunker`).
//! - In-memory ANN index over chunk embeddings (`vector_store`).
//! - OpenAI-compatible chat & embedding calls (`api`).
//! - Retrieval-augmented query engine (`engine`).
//! - The interactive prompt/response loop (`session`).
//!
//! The heavy lifting (PDF parsing, ANN search, tokenization, inference)
//! belongs to external libraries and remote endpoints; this crate only wires
//! them together for a single transient session. Nothing is persisted between
//! runs.

pub mod api;
pub mod bootstrap;
pub mod chunker;
pub mod commands;
pub mod config;
pub mod document;
pub mod engine;
pub mod session;
pub mod vector_store;
