//! Bolso Core Library
//!
//! Shared functionality for the Bolso expense assistant:
//! - Expense and message data model
//! - Tolerant extraction of expense payloads from assistant replies
//! - Base64 PCM audio decoding for spoken replies
//! - Pluggable assistant gateway backends (Gemini, mock)
//! - Conversation session orchestration
//! - File-backed expense ledger with atomic writes
//! - Ledger summary reporting

pub mod ai;
pub mod audio;
pub mod error;
pub mod extract;
pub mod models;
pub mod prompts;
pub mod report;
pub mod session;
pub mod store;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AssistantGateway, GatewayClient, GeminiBackend, MockBackend};
pub use audio::{decode_pcm16, AudioBuffer};
pub use error::{Error, Result};
pub use extract::{extract_expense, parse_expense_block};
pub use models::{Expense, Message, MessageKind, Role};
pub use report::{CategoryTotal, LedgerReport};
pub use session::{ChatSession, TurnOutcome};
pub use store::{default_ledger_path, LedgerStore};
