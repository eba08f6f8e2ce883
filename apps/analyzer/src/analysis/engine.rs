//! Résumé Analysis Engine: composes the analyzers into one `AnalysisReport`.
//!
//! Stateless per call: every run builds its own findings from the input text.
//! The only shared piece is the optional AI strategy inside the recommendation
//! generator, which the composing component owns.

use thiserror::Error;
use tracing::debug;

use crate::analysis::aggregate::overall_score;
use crate::analysis::ats::check_ats_compatibility;
use crate::analysis::keywords::extract_keywords;
use crate::analysis::models::{AnalysisReport, Recommendations, Sections};
use crate::analysis::recommendations::{
    rule_based_recommendations, GeneratedRecommendations, RecommendationGenerator,
};
use crate::analysis::sections::analyze_sections;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("document text is empty")]
    EmptyDocument,
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    recommender: RecommendationGenerator,
}

impl ResumeAnalyzer {
    pub fn new(recommender: RecommendationGenerator) -> Self {
        Self { recommender }
    }

    /// Full analysis. The AI path, if configured, can only change
    /// strengths/weaknesses/recommendations and `ai_powered`.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport, AnalysisError> {
        ensure_not_empty(text)?;
        let sections = analyze_sections(text);
        let GeneratedRecommendations {
            recommendations,
            ai_powered,
        } = self.recommender.generate(text, &sections).await;
        Ok(assemble(text, sections, recommendations, ai_powered))
    }

    /// Synchronous analysis that never touches the AI backend.
    pub fn analyze_rule_based(text: &str) -> Result<AnalysisReport, AnalysisError> {
        ensure_not_empty(text)?;
        let sections = analyze_sections(text);
        let recommendations = rule_based_recommendations(&sections);
        Ok(assemble(text, sections, recommendations, false))
    }

    pub fn ai_enabled(&self) -> bool {
        self.recommender.has_ai()
    }
}

fn ensure_not_empty(text: &str) -> Result<(), AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyDocument);
    }
    Ok(())
}

fn assemble(
    text: &str,
    sections: Sections,
    recommendations: Recommendations,
    ai_powered: bool,
) -> AnalysisReport {
    let overall_score = overall_score(&sections);
    let keywords = extract_keywords(text);
    let ats_compatibility = check_ats_compatibility(text, &sections);

    debug!(
        overall_score,
        ats_score = ats_compatibility.score,
        ai_powered,
        "Analysis complete"
    );

    AnalysisReport {
        overall_score,
        sections,
        keywords,
        ats_compatibility,
        strengths: recommendations.strengths,
        weaknesses: recommendations.weaknesses,
        recommendations: recommendations.recommendations,
        ai_powered,
    }
}
