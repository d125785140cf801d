//! Core data model: expenses and conversation messages

use serde::{Deserialize, Serialize};

/// Category sentinel used when the model does not name one
pub const DEFAULT_CATEGORY: &str = "Outros";

/// Description sentinel used when the model does not name one
pub const DEFAULT_DESCRIPTION: &str = "Gasto registrado";

/// One recorded expense, the canonical unit persisted to the ledger.
///
/// Immutable once created: the ledger appends, deletes by id, or resets,
/// but never edits a record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Opaque client-side id, freshly generated at extraction time
    pub id: String,
    /// Non-negative decimal currency value; 0.0 when unparsable
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub description: String,
    /// ISO-8601 date-time string; defaults to extraction wall-clock time
    pub timestamp: String,
}

impl Expense {
    /// Generate a fresh expense id
    ///
    /// Client-side only, so collisions are theoretically possible and
    /// accepted; uniqueness within one ledger is all that matters.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// What kind of input produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
}

/// One turn in the conversation log
///
/// Messages are append-only and never mutated or deleted individually;
/// the whole log can be cleared by a session reset. The log lives in
/// memory only and is not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Raw text; assistant messages may embed a fenced json payload block
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Original attached media, retained for re-display only, never re-parsed
    #[serde(rename = "dataUrl", default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

impl Message {
    /// Create a plain text message
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            kind: MessageKind::Text,
            data_url: None,
        }
    }

    /// Create a user message carrying attached media
    pub fn with_media(content: impl Into<String>, kind: MessageKind, data_url: String) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            kind,
            data_url: Some(data_url),
        }
    }
}
