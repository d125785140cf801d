//! Test utilities for bolso-core
//!
//! This module provides testing infrastructure including a mock Gemini
//! server that can be used for development and integration tests.

use axum::{
    extract::{Json, Path},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock Gemini server for testing and development
///
/// Answers the `generateContent` endpoint for any model name. A model name
/// containing `tts` gets an inline audio payload; any other model gets a
/// sarcastic text reply, with a fenced json block appended when the last
/// user part mentions spending.
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1beta/models", get(handle_models))
            .route("/v1beta/models/:model", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "models": [
            {"name": "models/gemini-3-flash-preview"},
            {"name": "models/gemini-2.5-flash-preview-tts"}
        ]
    }))
}

/// generateContent endpoint
///
/// The path parameter arrives as `<model>:generateContent`; the action
/// suffix is ignored.
async fn handle_generate(
    Path(model): Path<String>,
    Json(request): Json<Value>,
) -> Json<Value> {
    if model.contains("tts") {
        return Json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"inlineData": {"mimeType": "audio/pcm", "data": "AAABAAIA"}}]
                }
            }]
        }));
    }

    let prompt = last_user_text(&request);
    let reply = if prompt.to_lowercase().contains("gastei") {
        concat!(
            "Lá se vai seu dinheiro de novo, hein.\n",
            "```json\n",
            "{\"amount\": 45, \"category\": \"Mercado\", \"description\": \"Supermercado\"}\n",
            "```"
        )
        .to_string()
    } else {
        "Fala, gastador. Sem gasto novo dessa vez?".to_string()
    };

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": reply}]}
        }]
    }))
}

/// Text of the last user content entry in the request
fn last_user_text(request: &Value) -> String {
    request["contents"]
        .as_array()
        .and_then(|contents| {
            contents
                .iter()
                .rev()
                .find(|c| c["role"] == "user")
        })
        .and_then(|content| content["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}
