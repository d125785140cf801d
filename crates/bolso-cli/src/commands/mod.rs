//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `chat` - Conversational commands (interactive chat, one-shot send)
//! - `expenses` - Ledger management commands (list, delete, clear, dashboard)
//! - `status` - Gateway and ledger status command

pub mod chat;
pub mod expenses;
pub mod status;

// Re-export command functions for main.rs
pub use chat::*;
pub use expenses::*;
pub use status::*;

use std::path::PathBuf;

use anyhow::Result;
use bolso_core::{default_ledger_path, GatewayClient, LedgerStore};

/// Resolve the ledger store
///
/// Precedence: `--ledger` flag, then the `BOLSO_LEDGER` environment
/// variable, then the platform default path.
pub fn open_store(ledger: Option<&PathBuf>) -> LedgerStore {
    if let Some(path) = ledger {
        return LedgerStore::open(path);
    }
    if let Ok(path) = std::env::var("BOLSO_LEDGER") {
        return LedgerStore::open(PathBuf::from(path));
    }
    LedgerStore::open(default_ledger_path())
}

/// Build the gateway from the environment, with a setup hint on failure
pub fn open_gateway() -> Result<GatewayClient> {
    GatewayClient::from_env().ok_or_else(|| {
        anyhow::anyhow!(
            "No gateway configured. Set GEMINI_API_KEY (and optionally GEMINI_MODEL), \
             or BOLSO_GATEWAY=mock for offline use."
        )
    })
}

/// Format a currency value for display (BRL)
pub fn format_brl(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

/// Truncate a string to a maximum length, adding "..." if truncated
///
/// Cuts on a char boundary; categories and descriptions are model-authored
/// PT-BR text, so accented characters are the norm rather than the
/// exception.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= keep)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}
