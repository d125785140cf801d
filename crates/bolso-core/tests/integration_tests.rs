//! Integration tests for bolso-core
//!
//! These tests exercise the full turn → extract → persist workflow against
//! the mock Gemini server over real HTTP.

use bolso_core::{
    ai::{AssistantGateway, GatewayClient, GeminiBackend},
    session::ChatSession,
    store::LedgerStore,
    test_utils::MockGeminiServer,
};
use tempfile::TempDir;

fn backend_for(server: &MockGeminiServer) -> GeminiBackend {
    GeminiBackend::new("test-key", "gemini-3-flash-preview").with_base_url(&server.url())
}

// =============================================================================
// Gateway Integration Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_against_mock_server() {
    let server = MockGeminiServer::start().await;
    let backend = backend_for(&server);

    assert!(backend.health_check().await);
}

#[tokio::test]
async fn test_text_turn_round_trip() {
    let server = MockGeminiServer::start().await;
    let backend = backend_for(&server);

    let reply = backend
        .send_turn("Bom dia", None, None)
        .await
        .expect("Turn failed");

    assert!(!reply.is_empty());
    assert!(!reply.contains("```json"));
}

#[tokio::test]
async fn test_spending_turn_carries_expense_block() {
    let server = MockGeminiServer::start().await;
    let backend = backend_for(&server);

    let reply = backend
        .send_turn("Gastei 45 no mercado", None, None)
        .await
        .expect("Turn failed");

    assert!(reply.contains("```json"));
    let expense = bolso_core::extract_expense(&reply).expect("No expense in reply");
    assert_eq!(expense.amount, 45.0);
    assert_eq!(expense.category, "Mercado");
}

#[tokio::test]
async fn test_media_turn_round_trip() {
    let server = MockGeminiServer::start().await;
    let backend = backend_for(&server);

    let reply = backend
        .send_turn("", Some(&[0xFF, 0xD8, 0xFF, 0xE0]), None)
        .await
        .expect("Turn failed");

    assert!(!reply.is_empty());
}

#[tokio::test]
async fn test_speech_synthesis_returns_audio_payload() {
    let server = MockGeminiServer::start().await;
    let backend = backend_for(&server)
        .with_tts_model("gemini-2.5-flash-preview-tts");

    let speech = backend
        .synthesize_speech("Lá se foi seu dinheiro.")
        .await
        .expect("Synthesis failed");

    let payload = speech.expect("No audio payload");
    let buffer = bolso_core::decode_pcm16(&payload, 24_000, 1).expect("Bad PCM payload");
    assert!(buffer.frames() > 0);
}

#[tokio::test]
async fn test_speech_synthesis_skips_empty_text() {
    let server = MockGeminiServer::start().await;
    let backend = backend_for(&server);

    let speech = backend
        .synthesize_speech("```json\n{\"amount\": 1}\n```")
        .await
        .expect("Synthesis failed");
    assert!(speech.is_none());
}

// =============================================================================
// Session Integration Tests
// =============================================================================

#[tokio::test]
async fn test_full_session_workflow() {
    let server = MockGeminiServer::start().await;
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("ledger.json");

    let gateway = GatewayClient::Gemini(backend_for(&server));
    let mut session = ChatSession::new(gateway, LedgerStore::open(&ledger_path));
    session.set_muted(true);

    // A chit-chat turn records nothing
    let outcome = session.send_text("Bom dia").await.expect("Turn failed");
    assert!(outcome.expense.is_none());
    assert!(session.expenses().is_empty());

    // A spending turn lands in the ledger
    let outcome = session
        .send_text("Gastei 45 no mercado")
        .await
        .expect("Turn failed");
    assert_eq!(outcome.expense.as_ref().map(|e| e.amount), Some(45.0));
    assert_eq!(session.expenses().len(), 1);

    // A fresh session against the same file sees the expense
    let session2 = ChatSession::new(GatewayClient::mock(), LedgerStore::open(&ledger_path));
    assert_eq!(session2.expenses().len(), 1);
    assert_eq!(session2.expenses()[0].category, "Mercado");
}

#[tokio::test]
async fn test_unmuted_session_gets_speech() {
    let server = MockGeminiServer::start().await;
    let dir = TempDir::new().unwrap();

    let backend = backend_for(&server).with_tts_model("mock-tts");
    let mut session = ChatSession::new(
        GatewayClient::Gemini(backend),
        LedgerStore::open(dir.path().join("ledger.json")),
    );

    let outcome = session.send_text("Bom dia").await.expect("Turn failed");
    assert!(outcome.speech.is_some());
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    let dir = TempDir::new().unwrap();
    let backend =
        GeminiBackend::new("test-key", "gemini-3-flash-preview").with_base_url("http://127.0.0.1:1");
    let mut session = ChatSession::new(
        GatewayClient::Gemini(backend),
        LedgerStore::open(dir.path().join("ledger.json")),
    );

    let outcome = session.send_text("oi").await.expect("Turn failed");
    assert!(outcome.reply.contains("Tenta de novo"));
    assert!(outcome.expense.is_none());
}
