//! Gemini backend implementation
//!
//! HTTP client for the Gemini `generateContent` REST API. One backend
//! instance serves both chat turns and speech synthesis (with a separate
//! TTS-capable model for the latter).
//!
//! Text-only turns go through a replayed conversation history so the model
//! keeps context; turns carrying media are sent one-shot, since the attached
//! payload is self-contained.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompts::{SPEECH_PREFIX, SYSTEM_INSTRUCTION};

use super::AssistantGateway;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const TTS_VOICE: &str = "Puck";

/// Gemini backend
///
/// Holds the replayed conversation history behind a shared lock so a cloned
/// client keeps talking in the same conversation.
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    tts_model: String,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiBackend {
    /// Create a new Gemini backend with default models
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Override the API base URL (used by tests to point at a mock server)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the speech synthesis model
    pub fn with_tts_model(mut self, tts_model: &str) -> Self {
        self.tts_model = tts_model.to_string();
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let backend = Self::new(&api_key, &model);
        match std::env::var("GEMINI_TTS_MODEL") {
            Ok(tts) => Some(backend.with_tts_model(&tts)),
            Err(_) => Some(backend),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self
            .http_client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// The stored conversation plus the not-yet-committed user turn.
    ///
    /// The turn is not written to the shared history here: a failed request
    /// must leave the history exactly as it was, or later turns would
    /// replay an unanswered user message.
    fn conversation_with(&self, user_turn: &Content) -> Result<Vec<Content>> {
        let history = self
            .history
            .lock()
            .map_err(|_| Error::InvalidData("Failed to acquire history lock".into()))?;
        let mut contents = history.clone();
        contents.push(user_turn.clone());
        Ok(contents)
    }

    /// Commit a completed exchange, keeping user/model roles paired
    fn commit_turn(&self, user_turn: Content, reply: &str) -> Result<()> {
        let mut history = self
            .history
            .lock()
            .map_err(|_| Error::InvalidData("Failed to acquire history lock".into()))?;
        history.push(user_turn);
        history.push(Content::model_text(reply));
        Ok(())
    }
}

/// The spoken portion of a reply: everything before the json fence
fn speech_text(text: &str) -> &str {
    text.split("```json").next().unwrap_or("").trim()
}

#[async_trait]
impl AssistantGateway for GeminiBackend {
    async fn send_turn(
        &self,
        text: &str,
        image: Option<&[u8]>,
        audio: Option<&[u8]>,
    ) -> Result<String> {
        let has_media = image.is_some() || audio.is_some();

        let mut parts = Vec::new();
        if text.is_empty() && has_media {
            parts.push(Part::text("Analise este gasto."));
        } else {
            parts.push(Part::text(text));
        }
        if let Some(bytes) = image {
            parts.push(Part::inline("image/jpeg", &STANDARD.encode(bytes)));
        }
        if let Some(bytes) = audio {
            parts.push(Part::inline("audio/webm", &STANDARD.encode(bytes)));
        }
        let user_turn = Content::user(parts);

        // Media turns are one-shot; text turns replay the conversation
        let contents = if has_media {
            vec![user_turn.clone()]
        } else {
            self.conversation_with(&user_turn)?
        };

        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content::bare_text(SYSTEM_INSTRUCTION)),
            generation_config: None,
        };

        let response = self.generate(&self.model, &request).await?;
        let reply = response.text();
        debug!(model = %self.model, "Gemini reply: {}", reply);

        if !has_media {
            self.commit_turn(user_turn, &reply)?;
        }

        Ok(reply)
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Option<String>> {
        let spoken = speech_text(text);
        if spoken.is_empty() {
            return Ok(None);
        }

        let request = GenerateRequest {
            contents: vec![Content::user(vec![Part::text(format!(
                "{}{}",
                SPEECH_PREFIX, spoken
            ))])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: TTS_VOICE.to_string(),
                        },
                    },
                }),
            }),
        };

        let response = self.generate(&self.tts_model, &request).await?;
        Ok(response.inline_audio())
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// Request to the generateContent API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

/// One content entry (a turn, or the system instruction)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".into()),
            parts,
        }
    }

    fn model_text(text: &str) -> Self {
        Self {
            role: Some("model".into()),
            parts: vec![Part::text(text)],
        }
    }

    /// Role-less content, used for the system instruction
    fn bare_text(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        alias = "inline_data",
        default
    )]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, empty when absent
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// Base64 payload of the first inline-data part, when present
    fn inline_audio(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_text_strips_json_fence() {
        let reply = "Lá se foi seu dinheiro.\n```json\n{\"amount\": 10}\n```";
        assert_eq!(speech_text(reply), "Lá se foi seu dinheiro.");
    }

    #[test]
    fn test_speech_text_empty_for_bare_block() {
        assert_eq!(speech_text("```json\n{}\n```"), "");
        assert_eq!(speech_text("   "), "");
    }

    #[test]
    fn test_request_serialization_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content::user(vec![
                Part::text("oi"),
                Part::inline("image/jpeg", "QUJD"),
            ])],
            system_instruction: Some(Content::bare_text("persona")),
            generation_config: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "oi");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "persona");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_tts_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content::user(vec![Part::text("fala")])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: TTS_VOICE.to_string(),
                        },
                    },
                }),
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Puck"
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Ih, "}, {"text": "gastador."}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), "Ih, gastador.");
    }

    #[test]
    fn test_response_inline_audio() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"inlineData": {"mimeType": "audio/pcm", "data": "AAA="}}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.inline_audio().as_deref(), Some("AAA="));
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
        assert!(response.inline_audio().is_none());
    }

    #[test]
    fn test_from_env_missing() {
        std::env::remove_var("GEMINI_API_KEY");
        assert!(GeminiBackend::from_env().is_none());
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let backend = GeminiBackend::new("key", "model").with_base_url("http://localhost:1234/");
        assert_eq!(backend.host(), "http://localhost:1234");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend =
            GeminiBackend::new("key", "model").with_base_url("http://127.0.0.1:1");
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_history_untouched() {
        let backend =
            GeminiBackend::new("key", "model").with_base_url("http://127.0.0.1:1");
        assert!(backend.send_turn("primeira", None, None).await.is_err());

        let history = backend.history.lock().unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_successful_turn_commits_paired_roles() {
        let server = crate::test_utils::MockGeminiServer::start().await;
        let backend =
            GeminiBackend::new("key", "gemini-3-flash-preview").with_base_url(&server.url());

        backend.send_turn("Bom dia", None, None).await.unwrap();

        let history = backend.history.lock().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role.as_deref(), Some("user"));
        assert_eq!(history[1].role.as_deref(), Some("model"));
    }

    #[tokio::test]
    async fn test_retry_after_failure_does_not_duplicate_user_turn() {
        let server = crate::test_utils::MockGeminiServer::start().await;

        // First attempt against a dead port fails; the retry must not see
        // the failed attempt in the replayed conversation
        let backend =
            GeminiBackend::new("key", "gemini-3-flash-preview").with_base_url("http://127.0.0.1:1");
        assert!(backend.send_turn("primeira", None, None).await.is_err());

        let backend = backend.with_base_url(&server.url());
        backend.send_turn("primeira", None, None).await.unwrap();

        let history = backend.history.lock().unwrap();
        let roles: Vec<_> = history.iter().filter_map(|c| c.role.as_deref()).collect();
        assert_eq!(roles, vec!["user", "model"]);
        assert_eq!(history[0].parts[0].text.as_deref(), Some("primeira"));
    }

    #[tokio::test]
    async fn test_media_turn_does_not_touch_history() {
        let server = crate::test_utils::MockGeminiServer::start().await;
        let backend =
            GeminiBackend::new("key", "gemini-3-flash-preview").with_base_url(&server.url());

        backend
            .send_turn("", Some(&[0xFF, 0xD8]), None)
            .await
            .unwrap();

        let history = backend.history.lock().unwrap();
        assert!(history.is_empty());
    }
}
