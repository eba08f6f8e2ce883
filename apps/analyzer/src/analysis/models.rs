//! Output data models for the résumé analysis engine.
//!
//! Field names serialize in camelCase so the JSON matches what the job-board
//! frontend already renders.

use serde::{Deserialize, Serialize};

/// Result of one section analyzer.
///
/// `found` is `None` only for the formatting section, which always applies.
/// `years_of_experience` is set only on the experience section and
/// `extracted_skills` only on the skills section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFinding {
    pub score: u32, // 0 – 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_skills: Option<Vec<String>>,
}

impl SectionFinding {
    /// Whether the section was detected. Formatting has no detection and reports `false`.
    pub fn is_found(&self) -> bool {
        self.found.unwrap_or(false)
    }
}

/// All six section findings. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub contact_info: SectionFinding,
    pub summary: SectionFinding,
    pub experience: SectionFinding,
    pub education: SectionFinding,
    pub skills: SectionFinding,
    pub formatting: SectionFinding,
}

impl Sections {
    /// Sections paired with their wire names, in report order.
    pub fn entries(&self) -> [(&'static str, &SectionFinding); 6] {
        [
            ("contactInfo", &self.contact_info),
            ("summary", &self.summary),
            ("experience", &self.experience),
            ("education", &self.education),
            ("skills", &self.skills),
            ("formatting", &self.formatting),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsCompatibility {
    pub score: u32, // 0 – 100
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Strengths, weaknesses and recommendations, from either the rule-based
/// generator or an AI backend. All three keys are required when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Full analysis report. Built fresh on every call, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub overall_score: u32,
    pub sections: Sections,
    pub keywords: Vec<String>,
    pub ats_compatibility: AtsCompatibility,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    /// True when the AI backend produced strengths/weaknesses/recommendations.
    pub ai_powered: bool,
}
