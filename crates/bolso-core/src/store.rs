//! Expense ledger persistence
//!
//! The ledger is a single JSON array of expenses in a file. Loads are
//! tolerant: a missing or unreadable file yields an empty ledger rather than
//! an error, so a corrupted file never bricks the assistant. Saves replace
//! the whole array atomically via a temp file rename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Expense;

/// Default ledger file location (~/.local/share/bolso/ledger.json on Linux)
pub fn default_ledger_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bolso")
        .join("ledger.json")
}

/// File-backed expense ledger
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Open a ledger at the given path (the file need not exist yet)
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the ledger at the platform default location
    pub fn open_default() -> Self {
        Self::open(default_ledger_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all expenses
    ///
    /// A missing file is an empty ledger. A file that fails to parse is
    /// logged and treated as empty, so a bad write never blocks new entries.
    pub fn load(&self) -> Vec<Expense> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read ledger: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(expenses) => expenses,
            Err(e) => {
                warn!(path = %self.path.display(), "Ledger is not valid JSON, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the stored ledger with the given expenses
    ///
    /// Writes to a temp file in the target directory and renames it into
    /// place, so a crash mid-write leaves the old ledger intact.
    pub fn save(&self, expenses: &[Expense]) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(expenses)?;
        let temp = tempfile::NamedTempFile::new_in(dir)?;
        fs::write(temp.path(), json)?;
        temp.persist(&self.path)
            .map_err(|e| Error::Storage(format!("Failed to replace ledger file: {}", e)))?;

        debug!(path = %self.path.display(), count = expenses.len(), "Ledger saved");
        Ok(())
    }
}
