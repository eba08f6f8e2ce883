//! Recommendation Generator: strengths, weaknesses and recommendations.
//!
//! Two strategies share one output type:
//! - rule-based: deterministic thresholds over section scores, never fails
//! - AI-backed: one call to the configured `AiEnrichmentStrategy`
//!
//! The AI path returns an explicit `Result`; `RecommendationGenerator::generate`
//! matches on it and falls back to the rule-based output on any `Err`.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::models::{Recommendations, Sections};
use crate::analysis::prompts::{RECOMMENDATIONS_PROMPT, RESUME_PROMPT_CHARS};
use crate::llm_client::{extract_json_object, AiEnrichmentStrategy, LlmError};

const STRENGTH_THRESHOLD: u32 = 80;
const WEAKNESS_THRESHOLD: u32 = 60;
const RECOMMENDATION_THRESHOLD: u32 = 70;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("response contained no JSON object")]
    NoJsonObject,

    #[error("response did not match the recommendations schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Knobs for the AI path.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentSettings {
    /// Deadline for the whole AI call, retries included.
    pub timeout: Duration,
    /// Leading characters of the résumé included in the prompt.
    pub prompt_chars: usize,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            prompt_chars: RESUME_PROMPT_CHARS,
        }
    }
}

/// Output of `RecommendationGenerator::generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecommendations {
    pub recommendations: Recommendations,
    pub ai_powered: bool,
}

/// Deterministic recommendations from section scores alone.
pub fn rule_based_recommendations(sections: &Sections) -> Recommendations {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    if sections.contact_info.score >= STRENGTH_THRESHOLD {
        strengths.push("Complete contact information".to_string());
    }
    if sections.experience.score >= STRENGTH_THRESHOLD {
        strengths.push("Strong work experience section".to_string());
    }
    if sections.skills.score >= STRENGTH_THRESHOLD {
        strengths.push("Comprehensive skills listing".to_string());
    }

    if sections.contact_info.score < WEAKNESS_THRESHOLD {
        weaknesses.push("Incomplete contact information".to_string());
    }
    if sections.summary.score < WEAKNESS_THRESHOLD {
        weaknesses.push("Missing or weak professional summary".to_string());
    }
    if sections.skills.score < WEAKNESS_THRESHOLD {
        weaknesses.push("Limited skills section".to_string());
    }

    if sections.summary.score < RECOMMENDATION_THRESHOLD {
        recommendations.push(
            "Add a compelling professional summary highlighting your key achievements".to_string(),
        );
    }
    if sections.experience.score < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Use more action verbs and quantify your achievements with numbers".to_string());
    }
    if sections.skills.score < RECOMMENDATION_THRESHOLD {
        recommendations.push("Include more relevant technical and soft skills".to_string());
    }
    recommendations.push("Tailor your resume to specific job descriptions".to_string());
    recommendations.push("Keep your resume to 1-2 pages maximum".to_string());

    Recommendations {
        strengths,
        weaknesses,
        recommendations,
    }
}

/// Fills the recommendations prompt with a bounded prefix of the résumé and
/// the four primary section scores.
pub fn build_prompt(text: &str, sections: &Sections, prompt_chars: usize) -> String {
    let excerpt: String = text.chars().take(prompt_chars).collect();
    // resume text goes last so placeholders inside it are left alone
    RECOMMENDATIONS_PROMPT
        .replace("{contact_score}", &sections.contact_info.score.to_string())
        .replace("{experience_score}", &sections.experience.score.to_string())
        .replace("{skills_score}", &sections.skills.score.to_string())
        .replace("{education_score}", &sections.education.score.to_string())
        .replace("{resume_text}", &excerpt)
}

/// Parses the first balanced JSON object in a model response.
/// All three keys must be present as arrays of strings.
pub fn parse_recommendations(response: &str) -> Result<Recommendations, EnrichmentError> {
    let json = extract_json_object(response).ok_or(EnrichmentError::NoJsonObject)?;
    Ok(serde_json::from_str(json)?)
}

/// Produces recommendations, preferring the AI strategy when one is configured.
#[derive(Clone)]
pub struct RecommendationGenerator {
    strategy: Option<Arc<dyn AiEnrichmentStrategy>>,
    settings: EnrichmentSettings,
}

impl RecommendationGenerator {
    pub fn new(
        strategy: Option<Arc<dyn AiEnrichmentStrategy>>,
        settings: EnrichmentSettings,
    ) -> Self {
        Self { strategy, settings }
    }

    pub fn rule_based() -> Self {
        Self::new(None, EnrichmentSettings::default())
    }

    pub fn has_ai(&self) -> bool {
        self.strategy.is_some()
    }

    /// One AI round-trip under the configured deadline.
    pub async fn enrich(
        &self,
        strategy: &dyn AiEnrichmentStrategy,
        text: &str,
        sections: &Sections,
    ) -> Result<Recommendations, EnrichmentError> {
        let prompt = build_prompt(text, sections, self.settings.prompt_chars);
        let response = tokio::time::timeout(self.settings.timeout, strategy.generate(&prompt))
            .await
            .map_err(|_| EnrichmentError::Timeout(self.settings.timeout))??;
        parse_recommendations(&response)
    }

    /// Never fails: any AI error degrades to the rule-based output with
    /// `ai_powered = false`.
    pub async fn generate(&self, text: &str, sections: &Sections) -> GeneratedRecommendations {
        let Some(strategy) = self.strategy.as_deref() else {
            return GeneratedRecommendations {
                recommendations: rule_based_recommendations(sections),
                ai_powered: false,
            };
        };

        match self.enrich(strategy, text, sections).await {
            Ok(recommendations) => {
                info!("AI recommendations generated by {}", strategy.name());
                GeneratedRecommendations {
                    recommendations,
                    ai_powered: true,
                }
            }
            Err(e) => {
                warn!(
                    "AI recommendations from {} failed, falling back to rule-based: {e}",
                    strategy.name()
                );
                GeneratedRecommendations {
                    recommendations: rule_based_recommendations(sections),
                    ai_powered: false,
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{AlwaysFails, FixedResponse, NeverAnswers};
    use super::*;
    use crate::analysis::models::SectionFinding;

    fn sections_with(contact: u32, summary: u32, experience: u32, skills: u32) -> Sections {
        let f = |score| SectionFinding {
            score,
            found: Some(true),
            ..Default::default()
        };
        Sections {
            contact_info: f(contact),
            summary: f(summary),
            experience: f(experience),
            education: f(80),
            skills: f(skills),
            formatting: SectionFinding {
                score: 70,
                ..Default::default()
            },
        }
    }

    const AI_JSON: &str = r#"{
        "strengths": ["Clear structure"],
        "weaknesses": ["No metrics"],
        "recommendations": ["Quantify impact"]
    }"#;

    #[test]
    fn test_rule_based_strong_resume() {
        let recs = rule_based_recommendations(&sections_with(100, 100, 100, 100));
        assert_eq!(
            recs.strengths,
            vec![
                "Complete contact information",
                "Strong work experience section",
                "Comprehensive skills listing",
            ]
        );
        assert!(recs.weaknesses.is_empty());
        assert_eq!(
            recs.recommendations,
            vec![
                "Tailor your resume to specific job descriptions",
                "Keep your resume to 1-2 pages maximum",
            ]
        );
    }

    #[test]
    fn test_rule_based_weak_resume() {
        let recs = rule_based_recommendations(&sections_with(0, 0, 0, 0));
        assert!(recs.strengths.is_empty());
        assert_eq!(
            recs.weaknesses,
            vec![
                "Incomplete contact information",
                "Missing or weak professional summary",
                "Limited skills section",
            ]
        );
        assert_eq!(recs.recommendations.len(), 5);
        assert_eq!(
            recs.recommendations[0],
            "Add a compelling professional summary highlighting your key achievements"
        );
    }

    #[test]
    fn test_rule_based_threshold_edges() {
        // 80 is a strength, 60 is not a weakness, 70 needs no recommendation
        let recs = rule_based_recommendations(&sections_with(80, 70, 70, 60));
        assert_eq!(recs.strengths, vec!["Complete contact information"]);
        assert!(recs.weaknesses.is_empty());
        assert_eq!(
            recs.recommendations,
            vec![
                "Include more relevant technical and soft skills",
                "Tailor your resume to specific job descriptions",
                "Keep your resume to 1-2 pages maximum",
            ]
        );

        let recs = rule_based_recommendations(&sections_with(79, 59, 69, 69));
        assert!(recs.strengths.is_empty());
        assert_eq!(recs.weaknesses, vec!["Missing or weak professional summary"]);
        assert_eq!(recs.recommendations.len(), 5);
    }

    #[test]
    fn test_prompt_truncates_and_embeds_scores() {
        let text = "x".repeat(5000);
        let prompt = build_prompt(&text, &sections_with(100, 50, 70, 40), 2000);
        assert!(prompt.contains(&format!("Resume Text: {}...", "x".repeat(2000))));
        assert!(!prompt.contains(&"x".repeat(2001)));
        assert!(prompt.contains("- Contact Info: 100/100"));
        assert!(prompt.contains("- Experience: 70/100"));
        assert!(prompt.contains("- Skills: 40/100"));
        assert!(prompt.contains("- Education: 80/100"));
    }

    #[test]
    fn test_prompt_leaves_placeholders_inside_resume_text() {
        let prompt = build_prompt("I love {skills_score}", &sections_with(1, 2, 3, 4), 2000);
        assert!(prompt.contains("I love {skills_score}"));
    }

    #[test]
    fn test_parse_recommendations_from_fenced_response() {
        let response = format!("Here is the analysis:\n```json\n{AI_JSON}\n```");
        let recs = parse_recommendations(&response).unwrap();
        assert_eq!(recs.strengths, vec!["Clear structure"]);
        assert_eq!(recs.recommendations, vec!["Quantify impact"]);
    }

    #[test]
    fn test_parse_recommendations_errors() {
        assert!(matches!(
            parse_recommendations("I cannot help with that."),
            Err(EnrichmentError::NoJsonObject)
        ));
        assert!(matches!(
            parse_recommendations(r#"{"strengths": ["a"]}"#),
            Err(EnrichmentError::Schema(_))
        ));
        assert!(matches!(
            parse_recommendations(r#"{"strengths": [1], "weaknesses": [], "recommendations": []}"#),
            Err(EnrichmentError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_without_strategy_is_rule_based() {
        let sections = sections_with(100, 0, 100, 30);
        let generated = RecommendationGenerator::rule_based()
            .generate("text", &sections)
            .await;
        assert!(!generated.ai_powered);
        assert_eq!(generated.recommendations, rule_based_recommendations(&sections));
    }

    #[tokio::test]
    async fn test_generate_uses_ai_response() {
        let generator = RecommendationGenerator::new(
            Some(Arc::new(FixedResponse(AI_JSON.to_string()))),
            EnrichmentSettings::default(),
        );
        let generated = generator
            .generate("text", &sections_with(0, 0, 0, 0))
            .await;
        assert!(generated.ai_powered);
        assert_eq!(generated.recommendations.weaknesses, vec!["No metrics"]);
    }

    #[tokio::test]
    async fn test_generate_falls_back_when_backend_errors() {
        let sections = sections_with(40, 50, 100, 100);
        let generator =
            RecommendationGenerator::new(Some(Arc::new(AlwaysFails)), EnrichmentSettings::default());
        let generated = generator.generate("text", &sections).await;
        assert!(!generated.ai_powered);
        assert_eq!(generated.recommendations, rule_based_recommendations(&sections));
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_malformed_json() {
        let sections = sections_with(40, 50, 100, 100);
        let generator = RecommendationGenerator::new(
            Some(Arc::new(FixedResponse("{\"strengths\": [".to_string()))),
            EnrichmentSettings::default(),
        );
        let generated = generator.generate("text", &sections).await;
        assert!(!generated.ai_powered);
        assert_eq!(generated.recommendations, rule_based_recommendations(&sections));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrich_times_out() {
        let settings = EnrichmentSettings {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let generator = RecommendationGenerator::new(Some(Arc::new(NeverAnswers)), settings);
        let sections = sections_with(0, 0, 0, 0);

        let err = generator
            .enrich(&NeverAnswers, "text", &sections)
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Timeout(d) if d == Duration::from_secs(5)));

        let generated = generator.generate("text", &sections).await;
        assert!(!generated.ai_powered);
    }
}
