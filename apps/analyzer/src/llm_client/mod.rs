/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// The analysis engine only sees `dyn AiEnrichmentStrategy`; which provider
/// sits behind it is decided once at startup from configuration.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AiProvider;

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicBackend;
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;

/// Shared completion budget. Recommendation JSON is small.
pub const MAX_TOKENS: u32 = 1000;
/// One initial attempt plus at most one retry, so a slow provider cannot
/// compound latency on the request path.
const MAX_ATTEMPTS: u32 = 2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No working model among candidates: {0}")]
    NoWorkingModel(String),
}

/// A text-generation backend used to enrich an analysis.
///
/// Implementations may fail for any transport, quota or format reason; callers
/// treat every `Err` the same way.
#[async_trait]
pub trait AiEnrichmentStrategy: Send + Sync {
    /// Short provider label for logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Error envelope shared by the OpenAI, Gemini and Anthropic APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub(crate) fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// First 100 characters of a response, for logs.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

/// Sends the request built by `build` and deserializes a JSON response.
/// Retries once on transport errors, 429 and 5xx with a 1s backoff.
pub(crate) async fn send_with_retry<R, F>(build: F) -> Result<R, LlmError>
where
    R: DeserializeOwned,
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "LLM call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(LlmError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            last_error = Some(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        return Ok(serde_json::from_str(&body)?);
    }

    Err(last_error.unwrap_or(LlmError::RateLimited {
        retries: MAX_ATTEMPTS - 1,
    }))
}

/// Builds the configured backend, or `None` when AI enrichment is disabled.
pub fn build_strategy(
    provider: &AiProvider,
    timeout: Duration,
) -> Option<Arc<dyn AiEnrichmentStrategy>> {
    let strategy: Arc<dyn AiEnrichmentStrategy> = match provider {
        AiProvider::OpenAi { api_key } => Arc::new(OpenAiBackend::new(api_key.clone(), timeout)),
        AiProvider::Gemini { api_key } => Arc::new(GeminiBackend::new(api_key.clone(), timeout)),
        AiProvider::Anthropic { api_key } => {
            Arc::new(AnthropicBackend::new(api_key.clone(), timeout))
        }
        AiProvider::Disabled => {
            info!("AI enrichment disabled, using rule-based recommendations");
            return None;
        }
    };
    info!("AI enrichment backend: {}", strategy.name());
    Some(strategy)
}

/// Returns the first balanced `{ ... }` object in `text`, skipping braces
/// inside JSON string literals. Models often wrap JSON in prose or code fences.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    debug!("Extracted JSON object of {} bytes", end - start);
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_object(input), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn test_extract_json_with_prose_around() {
        let input = "Sure! Here you go:\n{\"a\": [1, 2]}\nLet me know if you need more.";
        assert_eq!(extract_json_object(input), Some("{\"a\": [1, 2]}"));
    }

    #[test]
    fn test_extract_json_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(extract_json_object(input), Some(input));
    }

    #[test]
    fn test_extract_json_nested_and_braces_in_strings() {
        let input = r#"{"outer": {"inner": "a } brace"}, "q": "say \"{\""} trailing }"#;
        assert_eq!(
            extract_json_object(input),
            Some(r#"{"outer": {"inner": "a } brace"}, "q": "say \"{\""}"#)
        );
    }

    #[test]
    fn test_extract_json_first_object_wins() {
        let input = "{\"first\": 1} and {\"second\": 2}";
        assert_eq!(extract_json_object(input), Some("{\"first\": 1}"));
    }

    #[test]
    fn test_extract_json_missing_or_unbalanced() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"open\": [1, 2"), None);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(150);
        assert_eq!(preview(&text).chars().count(), 100);
    }

    #[test]
    fn test_build_strategy_disabled_returns_none() {
        assert!(build_strategy(&AiProvider::Disabled, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_build_strategy_names_backend() {
        let strategy = build_strategy(
            &AiProvider::Gemini {
                api_key: "key".to_string(),
            },
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(strategy.name(), "gemini");
    }
}
