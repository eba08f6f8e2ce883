// Résumé analysis LLM prompt templates.
// All prompts for the analysis module are defined here.

/// Only this many leading characters of the résumé are sent, to bound request cost.
pub const RESUME_PROMPT_CHARS: usize = 2000;

pub const RECOMMENDATIONS_PROMPT: &str = r#"Analyze this resume and provide specific recommendations for improvement:

Resume Text: {resume_text}...

Current Scores:
- Contact Info: {contact_score}/100
- Experience: {experience_score}/100
- Skills: {skills_score}/100
- Education: {education_score}/100

Please provide:
1. Top 3 strengths
2. Top 3 weaknesses
3. 5 specific recommendations for improvement

Return ONLY a valid JSON object with keys: strengths (array), weaknesses (array), recommendations (array)
Example format:
{
  "strengths": ["strength 1", "strength 2", "strength 3"],
  "weaknesses": ["weakness 1", "weakness 2", "weakness 3"],
  "recommendations": ["rec 1", "rec 2", "rec 3", "rec 4", "rec 5"]
}"#;
