//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use bolso_core::{Expense, GatewayClient, LedgerStore, MockBackend};
use tempfile::TempDir;

use crate::commands::{self, format_brl, truncate};

fn sample_expense(amount: f64, category: &str) -> Expense {
    Expense {
        id: Expense::new_id(),
        amount,
        category: category.to_string(),
        sub_category: None,
        description: "Supermercado".to_string(),
        timestamp: "2026-08-28T12:00:00Z".to_string(),
    }
}

fn seeded_store(dir: &TempDir) -> LedgerStore {
    let store = LedgerStore::open(dir.path().join("ledger.json"));
    store
        .save(&[sample_expense(45.0, "Mercado"), sample_expense(12.5, "Lazer")])
        .unwrap();
    store
}

// ========== Helper Tests ==========

#[test]
fn test_format_brl() {
    assert_eq!(format_brl(45.0), "R$ 45.00");
    assert_eq!(format_brl(0.5), "R$ 0.50");
    assert_eq!(format_brl(1234.567), "R$ 1234.57");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer string", 10), "a longe...");
}

#[test]
fn test_truncate_accented_text_cuts_on_char_boundary() {
    // 10 two-byte chars (20 bytes); the cut must not land mid-character
    assert_eq!(truncate("ãããããããããã", 16), "ãããããã...");
    assert_eq!(truncate("Alimentação e Bebidas", 16), "Alimentação...");
}

#[test]
fn test_open_store_precedence() {
    use std::path::{Path, PathBuf};

    // Flag beats env var beats default
    std::env::set_var("BOLSO_LEDGER", "/tmp/env-ledger.json");
    let flag = PathBuf::from("/tmp/flag-ledger.json");
    assert_eq!(
        commands::open_store(Some(&flag)).path(),
        Path::new("/tmp/flag-ledger.json")
    );
    assert_eq!(
        commands::open_store(None).path(),
        Path::new("/tmp/env-ledger.json")
    );

    std::env::remove_var("BOLSO_LEDGER");
    assert_ne!(
        commands::open_store(None).path(),
        Path::new("/tmp/env-ledger.json")
    );
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expenses_list() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    assert!(commands::cmd_expenses_list(&store).is_ok());
}

#[test]
fn test_cmd_expenses_list_empty() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(dir.path().join("ledger.json"));
    assert!(commands::cmd_expenses_list(&store).is_ok());
}

#[test]
fn test_cmd_expenses_delete() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    let id = store.load()[0].id.clone();

    commands::cmd_expenses_delete(&store, &id).unwrap();
    assert_eq!(store.load().len(), 1);

    // Deleting again is a no-op, not an error
    commands::cmd_expenses_delete(&store, &id).unwrap();
    assert_eq!(store.load().len(), 1);
}

#[test]
fn test_cmd_expenses_clear_with_yes() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);

    commands::cmd_expenses_clear(&store, true).unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn test_cmd_dashboard() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir);
    assert!(commands::cmd_dashboard(&store).is_ok());
}

#[test]
fn test_cmd_dashboard_empty() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(dir.path().join("ledger.json"));
    assert!(commands::cmd_dashboard(&store).is_ok());
}

// ========== Send Command Tests ==========

#[tokio::test]
async fn test_cmd_send_records_expense() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new();
    backend.push_reply("Lá vai.\n```json\n{\"amount\": 30, \"category\": \"Transporte\"}\n```");

    let store = LedgerStore::open(dir.path().join("ledger.json"));
    commands::cmd_send(
        GatewayClient::Mock(backend),
        store,
        "Gastei 30 de uber",
        None,
        None,
        true,
    )
    .await
    .unwrap();

    let reloaded = LedgerStore::open(dir.path().join("ledger.json")).load();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].amount, 30.0);
    assert_eq!(reloaded[0].category, "Transporte");
}

#[tokio::test]
async fn test_cmd_send_plain_chat() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(dir.path().join("ledger.json"));

    commands::cmd_send(GatewayClient::mock(), store, "Bom dia", None, None, true)
        .await
        .unwrap();

    assert!(LedgerStore::open(dir.path().join("ledger.json")).load().is_empty());
}

#[tokio::test]
async fn test_cmd_send_missing_image_file() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::open(dir.path().join("ledger.json"));

    let result = commands::cmd_send(
        GatewayClient::mock(),
        store,
        "",
        Some(std::path::Path::new("/nonexistent/nota.jpg")),
        None,
        true,
    )
    .await;
    assert!(result.is_err());
}
