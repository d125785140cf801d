//! Conversation orchestration
//!
//! `ChatSession` drives one conversation with the assistant: it keeps the
//! message transcript, forwards turns to the gateway, pulls structured
//! expenses out of replies, and persists the ledger after every change.
//!
//! A turn that fails at the gateway still produces a reply (the canned
//! fallback), so the conversation never dead-ends on a network error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::ai::{AssistantGateway, GatewayClient};
use crate::error::{Error, Result};
use crate::extract::extract_expense;
use crate::models::{Expense, Message, MessageKind, Role};
use crate::prompts::{FALLBACK_REPLY, GREETING, RESET_GREETING};
use crate::store::LedgerStore;

/// Placeholder transcript line for an image turn
const IMAGE_PLACEHOLDER: &str = "Nota fiscal enviada";
/// Placeholder transcript line for an audio turn
const AUDIO_PLACEHOLDER: &str = "Áudio enviado";

/// Result of one completed turn
#[derive(Debug)]
pub struct TurnOutcome {
    /// The assistant's reply text (fallback text when the gateway failed)
    pub reply: String,
    /// Expense recorded from this reply, if the assistant emitted one
    pub expense: Option<Expense>,
    /// Base64 PCM speech for the reply, when synthesis ran and succeeded
    pub speech: Option<String>,
}

/// One conversation with the assistant, with the ledger attached
pub struct ChatSession {
    gateway: GatewayClient,
    store: LedgerStore,
    messages: Vec<Message>,
    expenses: Vec<Expense>,
    busy: bool,
    muted: bool,
}

impl ChatSession {
    /// Start a session: load the ledger and seed the opening greeting
    pub fn new(gateway: GatewayClient, store: LedgerStore) -> Self {
        let expenses = store.load();
        debug!(count = expenses.len(), "Ledger loaded");

        Self {
            gateway,
            store,
            messages: vec![Message::text(Role::Assistant, GREETING)],
            expenses,
            busy: false,
            muted: false,
        }
    }

    /// Send a plain text turn
    pub async fn send_text(&mut self, text: &str) -> Result<TurnOutcome> {
        let user = Message::text(Role::User, text);
        self.run_turn(user, text, None, None).await
    }

    /// Send a receipt photo (JPEG bytes)
    pub async fn send_image(&mut self, bytes: &[u8]) -> Result<TurnOutcome> {
        let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes));
        let user = Message::with_media(IMAGE_PLACEHOLDER, MessageKind::Image, data_url);
        self.run_turn(user, "", Some(bytes), None).await
    }

    /// Send a recorded voice note (WebM bytes)
    pub async fn send_audio(&mut self, bytes: &[u8]) -> Result<TurnOutcome> {
        let data_url = format!("data:audio/webm;base64,{}", STANDARD.encode(bytes));
        let user = Message::with_media(AUDIO_PLACEHOLDER, MessageKind::Audio, data_url);
        self.run_turn(user, "", None, Some(bytes)).await
    }

    /// Run one turn behind the duplicate-submission gate.
    ///
    /// The busy flag is raised before the gateway call and lowered only
    /// when the turn runs to completion. A turn future dropped mid-flight
    /// (caller timeout or cancellation) leaves the session busy, and every
    /// later send is rejected with [`Error::Busy`]: the transcript may hold
    /// an unanswered user message at that point, and accepting more input
    /// would interleave turns.
    async fn run_turn(
        &mut self,
        user: Message,
        text: &str,
        image: Option<&[u8]>,
        audio: Option<&[u8]>,
    ) -> Result<TurnOutcome> {
        if self.busy {
            return Err(Error::Busy);
        }
        self.busy = true;
        let outcome = self.run_turn_inner(user, text, image, audio).await;
        self.busy = false;
        outcome
    }

    async fn run_turn_inner(
        &mut self,
        user: Message,
        text: &str,
        image: Option<&[u8]>,
        audio: Option<&[u8]>,
    ) -> Result<TurnOutcome> {
        self.messages.push(user);

        let reply = match self.gateway.send_turn(text, image, audio).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Gateway turn failed: {}", e);
                self.messages
                    .push(Message::text(Role::Assistant, FALLBACK_REPLY));
                return Ok(TurnOutcome {
                    reply: FALLBACK_REPLY.to_string(),
                    expense: None,
                    speech: None,
                });
            }
        };

        let expense = extract_expense(&reply);
        if let Some(expense) = &expense {
            info!(amount = expense.amount, category = %expense.category, "Expense recorded");
            self.expenses.push(expense.clone());
            self.store.save(&self.expenses)?;
        }

        self.messages.push(Message::text(Role::Assistant, &reply));

        // Speech is best-effort: a TTS failure never fails the turn
        let speech = if self.muted {
            None
        } else {
            match self.gateway.synthesize_speech(&reply).await {
                Ok(speech) => speech,
                Err(e) => {
                    warn!("Speech synthesis failed: {}", e);
                    None
                }
            }
        };

        Ok(TurnOutcome {
            reply,
            expense,
            speech,
        })
    }

    /// Delete an expense by id, returns whether anything was removed
    pub fn delete_expense(&mut self, id: &str) -> Result<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        let removed = self.expenses.len() != before;
        if removed {
            self.store.save(&self.expenses)?;
        }
        Ok(removed)
    }

    /// Full reset: wipe the ledger, persist the empty state, and reseed
    /// the transcript with the reset greeting
    pub fn clear_history(&mut self) -> Result<()> {
        self.expenses.clear();
        self.store.save(&self.expenses)?;
        self.messages = vec![Message::text(Role::Assistant, RESET_GREETING)];
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
