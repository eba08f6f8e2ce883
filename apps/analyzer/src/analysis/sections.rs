//! Section analyzers: independent, pure `text -> SectionFinding` heuristics.
//!
//! Every analyzer scans the whole document. Résumés reach us as flat text
//! with no reliable structure, so section detection is marker-substring
//! matching over the lower-cased text, not boundary parsing.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::models::{SectionFinding, Sections};
use crate::analysis::text::{contains_any, tokenize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// Optional country code, then three digit groups with optional separators/parens.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+[0-9]{1,3}[-.\s]?)?\(?[0-9]{1,4}\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,9}")
        .expect("valid phone regex")
});

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)linkedin\.com/in/[A-Za-z0-9_-]+").expect("valid linkedin regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)[0-9]{2}\b").expect("valid year regex"));

const SUMMARY_MARKERS: &[&str] = &["summary", "objective", "profile", "about"];

const EXPERIENCE_MARKERS: &[&str] = &["experience", "employment", "work history", "career"];

const ACTION_VERBS: &[&str] = &[
    "managed",
    "led",
    "developed",
    "created",
    "implemented",
    "achieved",
    "improved",
    "increased",
];

const EDUCATION_MARKERS: &[&str] = &[
    "education",
    "degree",
    "university",
    "college",
    "bachelor",
    "master",
    "phd",
];

const SKILLS_MARKERS: &[&str] = &["skills", "technologies", "competencies", "expertise"];

/// Reference vocabulary of technical skills. Iteration order is report order.
pub const TECHNICAL_SKILLS: &[&str] = &[
    "javascript",
    "python",
    "java",
    "react",
    "node.js",
    "sql",
    "html",
    "css",
    "mongodb",
    "postgresql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "agile",
];

const BULLET_CHARS: &[char] = &['•', '-', '*'];

/// Inclusive word-count window rewarded by the summary analyzer.
const SUMMARY_WORDS_MIN: usize = 50;
const SUMMARY_WORDS_MAX: usize = 150;

/// Runs all six analyzers over the same text.
pub fn analyze_sections(text: &str) -> Sections {
    Sections {
        contact_info: analyze_contact_info(text),
        summary: analyze_summary(text),
        experience: analyze_experience(text),
        education: analyze_education(text),
        skills: analyze_skills(text),
        formatting: analyze_formatting(text),
    }
}

pub fn analyze_contact_info(text: &str) -> SectionFinding {
    let has_email = EMAIL_RE.is_match(text);
    let has_phone = PHONE_RE.is_match(text);
    let has_linkedin = LINKEDIN_RE.is_match(text);

    let mut score = 0;
    let mut suggestions = Vec::new();

    if has_email {
        score += 40;
    } else {
        suggestions.push("Add a professional email address".to_string());
    }

    if has_phone {
        score += 30;
    } else {
        suggestions.push("Include your phone number".to_string());
    }

    if has_linkedin {
        score += 30;
    } else {
        suggestions.push("Add your LinkedIn profile URL".to_string());
    }

    SectionFinding {
        score,
        found: Some(has_email || has_phone),
        suggestions,
        ..Default::default()
    }
}

/// Word count is taken over the whole document, not an isolated summary block.
pub fn analyze_summary(text: &str) -> SectionFinding {
    let lower = text.to_lowercase();
    let has_summary = contains_any(&lower, SUMMARY_MARKERS);
    let word_count = tokenize(&lower).len();

    let mut score = 0;
    let mut suggestions = Vec::new();

    if has_summary {
        score += 50;
        if (SUMMARY_WORDS_MIN..=SUMMARY_WORDS_MAX).contains(&word_count) {
            score += 50;
        } else if word_count < SUMMARY_WORDS_MIN {
            suggestions
                .push("Expand your professional summary (aim for 50-150 words)".to_string());
        } else {
            suggestions
                .push("Shorten your professional summary (aim for 50-150 words)".to_string());
        }
    } else {
        suggestions.push("Add a professional summary or objective statement".to_string());
    }

    SectionFinding {
        score,
        found: Some(has_summary),
        suggestions,
        ..Default::default()
    }
}

pub fn analyze_experience(text: &str) -> SectionFinding {
    let lower = text.to_lowercase();
    let has_section = contains_any(&lower, EXPERIENCE_MARKERS);
    let has_action_verbs = contains_any(&lower, ACTION_VERBS);
    let years_of_experience = estimate_years_of_experience(text);

    let mut score = 0;
    let mut suggestions = Vec::new();

    if has_section {
        score += 40;
    } else {
        suggestions.push("Add a work experience section".to_string());
    }

    if has_action_verbs {
        score += 30;
    } else {
        suggestions.push("Use strong action verbs to describe your achievements".to_string());
    }

    if years_of_experience > 0 {
        score += 30;
    }

    SectionFinding {
        score,
        found: Some(has_section),
        suggestions,
        years_of_experience: Some(years_of_experience),
        ..Default::default()
    }
}

/// Span between the earliest and latest distinct 19xx/20xx year tokens.
/// Zero when fewer than two distinct years appear.
pub fn estimate_years_of_experience(text: &str) -> u32 {
    let years: BTreeSet<u32> = YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    match (years.first(), years.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0,
    }
}

pub fn analyze_education(text: &str) -> SectionFinding {
    let has_section = contains_any(&text.to_lowercase(), EDUCATION_MARKERS);

    let mut suggestions = Vec::new();
    if !has_section {
        suggestions.push("Add an education section with your qualifications".to_string());
    }

    SectionFinding {
        score: if has_section { 80 } else { 20 },
        found: Some(has_section),
        suggestions,
        ..Default::default()
    }
}

pub fn analyze_skills(text: &str) -> SectionFinding {
    let lower = text.to_lowercase();
    let has_section = contains_any(&lower, SKILLS_MARKERS);
    let extracted_skills: Vec<String> = TECHNICAL_SKILLS
        .iter()
        .filter(|skill| lower.contains(*skill))
        .map(|skill| skill.to_string())
        .collect();

    let mut score = 0;
    let mut suggestions = Vec::new();

    if has_section {
        score += 40;
    } else {
        suggestions.push("Add a dedicated skills section".to_string());
    }

    match extracted_skills.len() {
        n if n >= 5 => score += 60,
        3 | 4 => score += 40,
        _ => suggestions.push("Include more relevant technical skills".to_string()),
    }

    SectionFinding {
        score,
        found: Some(has_section),
        suggestions,
        extracted_skills: Some(extracted_skills),
        ..Default::default()
    }
}

/// Line count and bullet characters stand in for layout quality.
pub fn analyze_formatting(text: &str) -> SectionFinding {
    let consistent = text.split('\n').count() > 10;

    let mut score = if consistent { 70 } else { 40 };
    let mut suggestions = Vec::new();

    if !consistent {
        suggestions.push("Ensure consistent formatting throughout your resume".to_string());
    }

    if text.contains(BULLET_CHARS) {
        score += 30;
    } else {
        suggestions.push("Use bullet points to organize information clearly".to_string());
    }

    SectionFinding {
        score,
        found: None,
        suggestions,
        ..Default::default()
    }
}
