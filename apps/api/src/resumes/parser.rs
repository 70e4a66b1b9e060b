use serde::{Deserialize, Serialize};
use tracing::info;

use super::prompts::RESUME_PARSE_PROMPT;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub education: Vec<EducationItem>,
    pub experience: Vec<ExperienceItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    pub institution: String,
    pub degree: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    pub company: String,
    pub title: Option<String>,
    pub period: Option<String>,
    pub highlights: Vec<String>,
}

/// Turns extracted resume text into a structured summary.
pub async fn parse_resume(text: &str, llm: &LlmClient) -> Result<ParsedResume, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::validation("resume contains no extractable text"));
    }
    let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", text);
    let parsed: ParsedResume = llm
        .call_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse resume: {e}")))?;
    info!(
        "Parsed resume: {} skills, {} education, {} experience entries",
        parsed.skills.len(),
        parsed.education.len(),
        parsed.experience.len()
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_model_output_fills_defaults() {
        let parsed: ParsedResume =
            serde_json::from_str(r#"{"name":"Ada","skills":["rust"],"education":[{"institution":"UCL"}]}"#)
                .unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Ada"));
        assert_eq!(parsed.education[0].institution, "UCL");
        assert!(parsed.experience.is_empty());
    }

    #[test]
    fn test_prompt_embeds_resume_text() {
        let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", "Skills: Go");
        assert!(prompt.ends_with("Skills: Go"));
    }
}
