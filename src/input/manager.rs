//! Loads CV and job documents from disk

use crate::error::{InterviewerError, Result};
use crate::input::file_detector::DocumentKind;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct DocumentLoader {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a document as plain text; the result is never blank
    pub async fn load(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(InterviewerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match DocumentKind::detect(path)? {
            DocumentKind::Pdf => PdfExtractor.extract(path).await?,
            DocumentKind::PlainText => PlainTextExtractor.extract(path).await?,
            DocumentKind::Markdown => MarkdownExtractor.extract(path).await?,
        };
        let text = text.trim().to_string();

        if text.is_empty() {
            return Err(InterviewerError::InvalidInput(format!(
                "No text found in: {}",
                path.display()
            )));
        }
        info!("Loaded {} ({} chars)", path.display(), text.chars().count());

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }
        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
