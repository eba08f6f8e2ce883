use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Key value shipped in example `.env` files; treated as "not configured".
const PLACEHOLDER_KEY: &str = "your-api-key-here";

/// Which text-generation backend enriches recommendations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi { api_key: String },
    Gemini { api_key: String },
    Anthropic { api_key: String },
    Disabled,
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ai_provider: AiProvider,
    pub ai_timeout: Duration,
    pub ai_prompt_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai_provider = resolve_provider(
            optional_env("AI_PROVIDER").as_deref(),
            optional_env("OPENAI_API_KEY"),
            optional_env("GEMINI_API_KEY"),
            optional_env("ANTHROPIC_API_KEY"),
        )?;

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ai_provider,
            ai_timeout: Duration::from_secs(parse_env("AI_TIMEOUT_SECS", 30)?),
            ai_prompt_chars: parse_env("AI_PROMPT_CHARS", 2000)?,
        })
    }
}

/// Reads a variable, treating empty strings and the placeholder key as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != PLACEHOLDER_KEY)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Picks the AI backend. An explicit `AI_PROVIDER` must have its key set;
/// otherwise the first configured key wins in the order OpenAI, Gemini, Anthropic.
pub fn resolve_provider(
    explicit: Option<&str>,
    openai_key: Option<String>,
    gemini_key: Option<String>,
    anthropic_key: Option<String>,
) -> Result<AiProvider> {
    let require = |key: Option<String>, var: &str| {
        key.with_context(|| format!("AI_PROVIDER requires '{var}' to be set"))
    };

    match explicit.map(|p| p.to_ascii_lowercase()).as_deref() {
        Some("openai") => Ok(AiProvider::OpenAi {
            api_key: require(openai_key, "OPENAI_API_KEY")?,
        }),
        Some("gemini") => Ok(AiProvider::Gemini {
            api_key: require(gemini_key, "GEMINI_API_KEY")?,
        }),
        Some("anthropic") => Ok(AiProvider::Anthropic {
            api_key: require(anthropic_key, "ANTHROPIC_API_KEY")?,
        }),
        Some("none") => Ok(AiProvider::Disabled),
        Some(other) => bail!(
            "AI_PROVIDER must be one of openai, gemini, anthropic, none; got '{other}'"
        ),
        None => Ok(if let Some(api_key) = openai_key {
            AiProvider::OpenAi { api_key }
        } else if let Some(api_key) = gemini_key {
            AiProvider::Gemini { api_key }
        } else if let Some(api_key) = anthropic_key {
            AiProvider::Anthropic { api_key }
        } else {
            AiProvider::Disabled
        }),
    }
}
