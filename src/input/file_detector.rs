//! Document kind detection

use crate::error::{InterviewerError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Markdown,
}

impl DocumentKind {
    pub const EXTENSIONS: [&'static str; 4] = ["pdf", "txt", "md", "markdown"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "text" => Some(DocumentKind::PlainText),
            "md" | "markdown" => Some(DocumentKind::Markdown),
            _ => None,
        }
    }

    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| InterviewerError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        Self::from_extension(extension).ok_or_else(|| {
            InterviewerError::UnsupportedFormat(format!(
                "{} (expected one of: {})",
                path.display(),
                Self::EXTENSIONS.join(", ")
            ))
        })
    }
}
