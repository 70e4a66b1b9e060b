pub const RESUME_PARSE_PROMPT: &str = r#"Summarize the following resume and extract its key details.

Return a JSON object with exactly these fields:
{
  "name": string or null,
  "email": string or null,
  "summary": string or null,
  "skills": [string],
  "education": [{"institution": string, "degree": string or null, "year": string or null}],
  "experience": [{"company": string, "title": string or null, "period": string or null, "highlights": [string]}]
}

Use only information present in the resume. Leave fields null or empty when absent.

RESUME:
{resume_text}"#;
