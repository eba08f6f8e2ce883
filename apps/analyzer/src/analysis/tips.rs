//! Improvement tips: a per-section digest of an `AnalysisReport`.

use serde::{Deserialize, Serialize};

use crate::analysis::models::AnalysisReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTip {
    pub section: String,
    pub score: u32,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementTips {
    pub overall_score: u32,
    pub tips: Vec<SectionTip>,
    pub recommendations: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

const ATS_SECTION: &str = "ATS Compatibility";

/// Lists every section that has suggestions, in report order, then the ATS
/// suggestions if there are any.
pub fn improvement_tips(report: &AnalysisReport) -> ImprovementTips {
    let mut tips: Vec<SectionTip> = report
        .sections
        .entries()
        .into_iter()
        .filter(|(_, finding)| !finding.suggestions.is_empty())
        .map(|(name, finding)| SectionTip {
            section: capitalize(name),
            score: finding.score,
            suggestions: finding.suggestions.clone(),
        })
        .collect();

    let ats = &report.ats_compatibility;
    if !ats.suggestions.is_empty() {
        tips.push(SectionTip {
            section: ATS_SECTION.to_string(),
            score: ats.score,
            suggestions: ats.suggestions.clone(),
        });
    }

    ImprovementTips {
        overall_score: report.overall_score,
        tips,
        recommendations: report.recommendations.clone(),
        strengths: report.strengths.clone(),
        weaknesses: report.weaknesses.clone(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
