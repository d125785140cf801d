//! Mock gateway backend for testing
//!
//! Returns scripted replies without any network traffic. Tests push the
//! replies they want with [`MockBackend::push_reply`]; when the script runs
//! dry a canned reply is returned so the backend never blocks a turn.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AssistantGateway;

const DEFAULT_REPLY: &str = "Anotado. Seu dinheiro virou fumaça de novo.";

/// Mock backend with a scripted reply queue
///
/// Clones share the same script, so a test can keep a handle while the
/// session under test owns another.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<String>>>,
    speech: Arc<Mutex<Option<String>>>,
    failing: Arc<AtomicBool>,
    hanging: Arc<AtomicBool>,
}

impl MockBackend {
    /// Create a mock backend with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for a future turn
    pub fn push_reply(&self, reply: &str) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply.to_string());
        }
    }

    /// Set the base64 payload returned by speech synthesis
    pub fn set_speech(&self, payload: &str) {
        if let Ok(mut speech) = self.speech.lock() {
            *speech = Some(payload.to_string());
        }
    }

    /// Make every subsequent call fail, or restore normal operation
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make turns hang forever (never resolve), or restore normal operation
    ///
    /// Used to test callers that abandon an in-flight turn.
    pub fn set_hanging(&self, hanging: bool) {
        self.hanging.store(hanging, Ordering::SeqCst);
    }

    fn next_reply(&self) -> String {
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }
}

#[async_trait]
impl AssistantGateway for MockBackend {
    async fn send_turn(
        &self,
        _text: &str,
        _image: Option<&[u8]>,
        _audio: Option<&[u8]>,
    ) -> Result<String> {
        if self.hanging.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Gateway("Mock backend set to fail".into()));
        }
        Ok(self.next_reply())
    }

    async fn synthesize_speech(&self, _text: &str) -> Result<Option<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Gateway("Mock backend set to fail".into()));
        }
        Ok(self.speech.lock().ok().and_then(|s| s.clone()))
    }

    async fn health_check(&self) -> bool {
        !self.failing.load(Ordering::SeqCst)
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
