//! # Bootstrapper
//!
//! Everything that has to be true before a session can start: where the
//! program lives, where the storage folder is, and where the document sits.
//!
//! The original tool mutated process-global state for this (changing the
//! working directory so relative paths resolve). Here the same facts are
//! captured in an explicit [`Workspace`] value that is handed to session
//! construction, which keeps the bootstrapper testable in isolation.
//!
//! ```no_run
//! use askpdf::bootstrap::Workspace;
//!
//! let ws = Workspace::discover("file.pdf").unwrap();
//! ws.ensure_storage_dir().unwrap();
//! ws.validate_document().unwrap();
//! ```

use once_cell::sync::OnceCell;
use std::{env, error::Error, fs, io, path::PathBuf};
use tracing::level_filters::LevelFilter;

/// Name of the working-directory-relative storage folder.
pub const STORAGE_DIR: &str = "files";

/// Name of the document the tool answers questions about when none is given.
pub const DEFAULT_DOCUMENT: &str = "file.pdf";

static TRACING: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber, at most once.
///
/// Verbosity defaults to ERROR so only critical messages reach the terminal;
/// set `ASKPDF_LOG` (e.g. `debug`) to raise it while debugging.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let level = env::var("ASKPDF_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::ERROR);

        tracing_subscriber::fmt().with_max_level(level).init();
    });
}

/// Filesystem layout for one run: the program's own directory, the storage
/// folder inside it, and the document under question.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    /// Directory the program resolves relative paths against.
    pub root: PathBuf,

    /// `root/files`, created on demand.
    pub storage_dir: PathBuf,

    /// The document the session answers questions about.
    pub document_path: PathBuf,
}

impl Workspace {
    /// Build a workspace anchored at an explicit root directory.
    pub fn at(root: PathBuf, file_name: &str) -> Self {
        let storage_dir = root.join(STORAGE_DIR);
        let document_path = root.join(file_name);
        Self {
            root,
            storage_dir,
            document_path,
        }
    }

    /// Anchor the workspace on the program's own directory so relative file
    /// references are stable regardless of where the binary is invoked from.
    ///
    /// Falls back to the current directory when the executable path cannot be
    /// resolved (some sandboxed environments).
    ///
    /// # Errors
    /// Returns an error when neither the executable location nor the current
    /// directory can be determined.
    pub fn discover(file_name: &str) -> Result<Self, Box<dyn Error>> {
        let root = match env::current_exe() {
            Ok(exe) => exe
                .parent()
                .map(|p| p.to_path_buf())
                .ok_or("Executable has no parent directory")?,
            Err(_) => env::current_dir()?,
        };

        tracing::debug!("Workspace root: {}", root.display());
        Ok(Self::at(root, file_name))
    }

    /// Create the storage folder if absent. Idempotent.
    pub fn ensure_storage_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.storage_dir)
    }

    /// Verify the document exists and is a regular file before any network
    /// work happens. The external reader still owns format validation.
    pub fn validate_document(&self) -> Result<(), Box<dyn Error>> {
        if !self.document_path.is_file() {
            return Err(format!(
                "Document not found: {} (expected next to the program)",
                self.document_path.display()
            )
            .into());
        }
        Ok(())
    }

    /// Location of the optional YAML config file, next to the program.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }
}
