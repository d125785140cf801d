//! Expense record extraction from assistant replies
//!
//! The assistant is prompted to end every processed expense with a fenced
//! ```json block. This module locates the first such block and normalizes
//! its payload into an [`Expense`]. The payload keys come in two spellings
//! (English and PT-BR); both are accepted, English preferred.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::{Expense, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION};

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap()
    })
}

/// Recognized key spellings, resolved to canonical fields with the English
/// key taking precedence over its PT-BR synonym.
#[derive(Debug, Deserialize)]
struct RawRecord {
    amount: Option<Value>,
    valor: Option<Value>,
    category: Option<Value>,
    categoria: Option<Value>,
    sub_category: Option<Value>,
    description: Option<Value>,
    estabelecimento: Option<Value>,
    timestamp: Option<Value>,
}

/// Extract at most one expense from assistant reply text.
///
/// Total function: a missing block and a malformed payload both yield
/// `None`. A broken payload must never fail the conversation turn, so the
/// strict parse error is logged and swallowed here.
pub fn extract_expense(text: &str) -> Option<Expense> {
    let payload = block_pattern().captures(text)?.get(1)?.as_str();

    match parse_expense_block(payload) {
        Ok(expense) => Some(expense),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed expense payload");
            None
        }
    }
}

/// Strict inner parse of a payload between the fences.
///
/// Fails on invalid JSON; field-level problems are absorbed by the
/// normalization defaults instead.
pub fn parse_expense_block(payload: &str) -> Result<Expense> {
    let raw: RawRecord = serde_json::from_str(payload)?;

    Ok(Expense {
        id: Expense::new_id(),
        amount: coerce_amount(raw.amount.or(raw.valor)),
        // An empty or non-string primary key falls through to its synonym
        // before the sentinel kicks in
        category: coerce_string(raw.category)
            .or_else(|| coerce_string(raw.categoria))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        sub_category: coerce_string(raw.sub_category),
        description: coerce_string(raw.description)
            .or_else(|| coerce_string(raw.estabelecimento))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        timestamp: coerce_string(raw.timestamp)
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
    })
}

/// Coerce a json value to f64, defaulting to 0.0
///
/// Accepts numbers and numeric strings; anything else (including "abc")
/// becomes 0.0, matching the tolerance contract.
fn coerce_amount(value: Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coerce a json value to a non-empty string
fn coerce_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
