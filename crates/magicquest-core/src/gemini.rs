//! Gemini bridge: story text generation via the Google Generative Language API.
//!
//! API key: `GOOGLE_API_KEY` in `.env`. Default model: `gemini-2.0-flash`.
//! The bridge makes a single call per request — no retry, no backoff, no
//! fallback. Callers own the parsing of the returned text; a failure of the
//! call itself (network, auth, safety block) propagates as [`GeminiError`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Errors from the Gemini call itself. The story service does *not* absorb
/// these; they surface as a failed request at the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Gemini reply carried no text candidate")]
    EmptyReply,
}

// Request/response shapes for models/{model}:generateContent
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Seam between the story service and the external model, so tests can script
/// replies without the network.
#[async_trait::async_trait]
pub trait StoryModel: Send + Sync {
    /// Send one free-text prompt and return the model's raw reply text.
    async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError>;
}

/// Reqwest-backed Gemini client.
pub struct GeminiBridge {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiBridge {
    /// Create a bridge from `GOOGLE_API_KEY`. Returns `None` when unset or blank.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("GOOGLE_API_KEY").ok()?.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    /// Create a bridge with an explicit API key. An empty key is accepted and
    /// fails at invocation time with the API's auth error.
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Set the model (e.g. `gemini-2.0-flash`, `gemini-1.5-pro`).
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait::async_trait]
impl StoryModel for GeminiBridge {
    async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::error!(target: "quest::gemini", %status, "Gemini API call failed");
            return Err(GeminiError::Api { status, body });
        }

        let parsed: GenerateContentResponse = res.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        // Safety-filtered prompts come back with no candidate text; treated the
        // same as any other failed call.
        if text.is_empty() {
            return Err(GeminiError::EmptyReply);
        }
        Ok(text)
    }
}
