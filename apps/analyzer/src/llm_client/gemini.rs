//! Gemini `generateContent` backend with a memoized working-model name.
//!
//! Model availability varies by key and region, so the backend probes a list
//! of candidates and remembers the first that answers. The memo is advisory:
//! any generation failure clears it and the next call probes again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{
    build_http_client, preview, send_with_retry, AiEnrichmentStrategy, LlmError, MAX_TOKENS,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Candidate models in order of preference.
pub const CANDIDATE_MODELS: &[&str] = &[
    "gemini-pro",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-1.0-pro-latest",
];

const PROBE_PROMPT: &str = "Test";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    candidates: Vec<String>,
    resolved_model: RwLock<Option<String>>,
}

impl GeminiBackend {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::with_base_url(api_key, timeout, GEMINI_API_BASE)
    }

    /// Same backend against another `models` endpoint root.
    pub fn with_base_url(api_key: String, timeout: Duration, base_url: &str) -> Self {
        Self {
            client: build_http_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            candidates: CANDIDATE_MODELS.iter().map(|m| m.to_string()).collect(),
            resolved_model: RwLock::new(None),
        }
    }

    /// The memoized model name, if one has been resolved and not invalidated.
    pub async fn cached_model(&self) -> Option<String> {
        self.resolved_model.read().await.clone()
    }

    /// Drops the memoized model so the next call re-probes.
    pub async fn invalidate(&self) {
        self.resolved_model.write().await.take();
    }

    async fn resolve_model(&self) -> Result<String, LlmError> {
        if let Some(model) = self.cached_model().await {
            return Ok(model);
        }

        for candidate in &self.candidates {
            debug!("Probing Gemini model {candidate}");
            match self.generate_with(candidate, PROBE_PROMPT).await {
                Ok(_) => {
                    info!("Gemini model {candidate} is available");
                    *self.resolved_model.write().await = Some(candidate.clone());
                    return Ok(candidate.clone());
                }
                Err(e) => warn!("Gemini model {candidate} failed: {e}"),
            }
        }

        Err(LlmError::NoWorkingModel(self.candidates.join(", ")))
    }

    async fn generate_with(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_TOKENS,
            },
        };
        let url = model_url(&self.base_url, model);

        // key travels in a header so transport errors never carry it in the URL
        let response: GenerateResponse = send_with_retry(|| {
            self.client
                .post(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&request_body)
        })
        .await?;

        response.text().ok_or(LlmError::EmptyContent)
    }
}

fn model_url(base_url: &str, model: &str) -> String {
    format!("{base_url}/{model}:generateContent")
}

#[async_trait]
impl AiEnrichmentStrategy for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let model = self.resolve_model().await?;
        match self.generate_with(&model, prompt).await {
            Ok(text) => {
                debug!("Gemini ({model}) response preview: {}", preview(&text));
                Ok(text)
            }
            Err(e) => {
                self.invalidate().await;
                Err(e)
            }
        }
    }
}
