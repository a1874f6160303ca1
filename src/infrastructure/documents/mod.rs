//! PDF text extraction

use std::path::{Path, PathBuf};

/// Reads text out of a fixed local PDF
#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
}

impl PdfReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Page texts concatenated in document order. Blocking.
    pub fn read(&self) -> Result<String, String> {
        read_pdf_pages(&self.path)
    }

    /// Same as `read`, off the async worker threads
    pub async fn read_async(&self) -> Result<String, String> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_pdf_pages(&path))
            .await
            .map_err(|e| format!("PDF reader task failed: {}", e))?
    }
}

/// Extract the text of every page and join it in page order
pub fn read_pdf_pages(path: &Path) -> Result<String, String> {
    if !path.is_file() {
        return Err(format!("No such file: {}", path.display()));
    }

    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| format!("PDF extraction failed: {e}"))?;

    tracing::debug!("Extracted {} pages from {}", pages.len(), path.display());

    Ok(pages.concat().trim().to_string())
}
