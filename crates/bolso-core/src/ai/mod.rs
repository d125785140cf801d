//! Pluggable assistant gateway abstraction
//!
//! The rest of the crate talks to the hosted language model through one
//! interface: send a multimodal turn, get back free text; separately ask for
//! a short spoken rendition of a reply.
//!
//! # Architecture
//!
//! - `AssistantGateway` trait: defines the interface for all backends
//! - `GatewayClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `BOLSO_GATEWAY`: Backend to use (gemini, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for the gemini backend)
//! - `GEMINI_MODEL`: Chat model name (default: gemini-3-flash-preview)
//! - `GEMINI_TTS_MODEL`: Speech model name (default: gemini-2.5-flash-preview-tts)

mod gemini;
mod mock;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all assistant backends
///
/// Backends should be Send + Sync to allow use across async tasks. A failed
/// `send_turn` is a turn failure for the caller; `synthesize_speech` returns
/// `Ok(None)` when no audio is available and the caller treats errors as
/// "no audio" too.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Send one user turn (text plus optional attached media), returning the
    /// raw reply text
    async fn send_turn(
        &self,
        text: &str,
        image: Option<&[u8]>,
        audio: Option<&[u8]>,
    ) -> Result<String>;

    /// Synthesize a short spoken rendition of a reply
    ///
    /// Returns the base64 PCM payload, or `None` when the model produced no
    /// audio for this text.
    async fn synthesize_speech(&self, text: &str) -> Result<Option<String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the chat model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete gateway client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
/// Constructed explicitly and injected into the session, so tests can
/// substitute the mock backend.
#[derive(Clone)]
pub enum GatewayClient {
    /// Hosted Gemini backend (HTTP API)
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl GatewayClient {
    /// Create a gateway client from environment variables
    ///
    /// Checks `BOLSO_GATEWAY` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY and GEMINI_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("BOLSO_GATEWAY").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(GatewayClient::Gemini),
            "mock" => Some(GatewayClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown BOLSO_GATEWAY, falling back to gemini");
                GeminiBackend::from_env().map(GatewayClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str, model: &str) -> Self {
        GatewayClient::Gemini(GeminiBackend::new(api_key, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        GatewayClient::Mock(MockBackend::new())
    }
}

// Implement AssistantGateway for GatewayClient by delegating to the inner backend
#[async_trait]
impl AssistantGateway for GatewayClient {
    async fn send_turn(
        &self,
        text: &str,
        image: Option<&[u8]>,
        audio: Option<&[u8]>,
    ) -> Result<String> {
        match self {
            GatewayClient::Gemini(b) => b.send_turn(text, image, audio).await,
            GatewayClient::Mock(b) => b.send_turn(text, image, audio).await,
        }
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Option<String>> {
        match self {
            GatewayClient::Gemini(b) => b.synthesize_speech(text).await,
            GatewayClient::Mock(b) => b.synthesize_speech(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            GatewayClient::Gemini(b) => b.health_check().await,
            GatewayClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            GatewayClient::Gemini(b) => b.model(),
            GatewayClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            GatewayClient::Gemini(b) => b.host(),
            GatewayClient::Mock(b) => b.host(),
        }
    }
}
