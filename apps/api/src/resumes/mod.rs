//! Resume ingestion: validate an uploaded PDF, then hand it to object storage.
//! The returned storage key is the opaque resume path kept on users and
//! applications.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

pub mod parser;
pub mod prompts;
pub mod storage;

pub use storage::{ResumeStorage, S3ResumeStorage};

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Please upload a PDF file.")]
    WrongExtension,

    #[error("Failed to read PDF: {0}")]
    Extraction(String),

    #[error("Incomplete resume: missing {}.", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("{0}")]
    Storage(String),
}

pub fn check_extension(filename: &str) -> Result<(), ResumeError> {
    if filename.to_ascii_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(ResumeError::WrongExtension)
    }
}

/// Extracts plain text from PDF bytes. The extractor can panic on malformed
/// input, so the panic is contained and reported as an extraction failure.
pub fn extract_text(bytes: &[u8]) -> Result<String, ResumeError> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ResumeError::Extraction(format!("{e:?}"))),
        Err(_) => Err(ResumeError::Extraction("unreadable PDF structure".to_string())),
    }
}

/// Keyword heuristics for the sections every resume is expected to carry.
pub fn missing_sections(text: &str) -> Vec<&'static str> {
    let text = text.to_lowercase();
    let has_name = text.contains("name") || text.contains("resume of") || text.len() > 50;
    let has_skills = text.contains("skill");
    let has_education = ["education", "degree", "university", "college"]
        .iter()
        .any(|kw| text.contains(kw));

    let mut missing = Vec::new();
    if !has_name {
        missing.push("name");
    }
    if !has_skills {
        missing.push("skills");
    }
    if !has_education {
        missing.push("education");
    }
    missing
}

/// Storage key for a user's resume. Only the final path component of the
/// client-supplied filename is kept.
pub fn object_key(owner_id: &str, filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("resume.pdf");
    format!("resumes/{owner_id}_{base}")
}

#[derive(Clone)]
pub struct ResumeIngestor {
    storage: Arc<dyn ResumeStorage>,
}

impl ResumeIngestor {
    pub fn new(storage: Arc<dyn ResumeStorage>) -> Self {
        Self { storage }
    }

    /// Validates and stores an upload, returning its storage key.
    pub async fn store(
        &self,
        owner_id: &str,
        filename: &str,
        bytes: Bytes,
    ) -> Result<String, ResumeError> {
        check_extension(filename)?;

        let pdf = bytes.clone();
        let text = tokio::task::spawn_blocking(move || extract_text(&pdf))
            .await
            .map_err(|e| ResumeError::Extraction(e.to_string()))??;

        let missing = missing_sections(&text);
        if !missing.is_empty() {
            return Err(ResumeError::Incomplete(missing));
        }

        let key = object_key(owner_id, filename);
        self.storage.put(&key, bytes).await?;
        info!("Stored resume for user {owner_id} at {key}");
        Ok(key)
    }

    /// Loads a stored resume and returns its text.
    pub async fn load_text(&self, key: &str) -> Result<String, ResumeError> {
        let bytes = self.storage.get(key).await?;
        tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| ResumeError::Extraction(e.to_string()))?
    }
}
