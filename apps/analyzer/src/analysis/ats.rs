//! ATS-Compatibility Checker: flags traits that trip up applicant tracking systems.

use crate::analysis::models::{AtsCompatibility, Sections};

const BASE_SCORE: i32 = 80;

/// Box-drawing characters that ATS parsers tend to mangle.
const SPECIAL_CHARS: &[char] = &['│', '┌', '└'];

const SPECIAL_CHARS_PENALTY: i32 = 20;
const MISSING_CONTACT_PENALTY: i32 = 30;
const MISSING_SKILLS_PENALTY: i32 = 20;

/// Starts at 80 and applies each triggered deduction once, floored at 0.
pub fn check_ats_compatibility(text: &str, sections: &Sections) -> AtsCompatibility {
    let mut score = BASE_SCORE;
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if text.contains(SPECIAL_CHARS) {
        score -= SPECIAL_CHARS_PENALTY;
        issues.push("Contains special characters that may not be ATS-friendly".to_string());
        suggestions.push("Remove special characters and use simple formatting".to_string());
    }

    if !sections.contact_info.is_found() {
        score -= MISSING_CONTACT_PENALTY;
        issues.push("Missing contact information".to_string());
        suggestions.push("Ensure contact information is clearly visible".to_string());
    }

    if !sections.skills.is_found() {
        score -= MISSING_SKILLS_PENALTY;
        issues.push("No dedicated skills section found".to_string());
        suggestions.push("Add a skills section with relevant keywords".to_string());
    }

    AtsCompatibility {
        score: score.max(0) as u32,
        issues,
        suggestions,
    }
}
