// Résumé analysis engine.
// Implements: section analyzers, keyword extraction, score aggregation,
// ATS compatibility, recommendations (rule-based with optional AI enrichment).
// All LLM calls go through llm_client; no direct provider calls here.

pub mod aggregate;
pub mod ats;
pub mod engine;
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod prompts;
pub mod recommendations;
pub mod sections;
pub mod text;
pub mod tips;
