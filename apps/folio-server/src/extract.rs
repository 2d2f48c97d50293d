//! Front-page text extraction using MuPDF
//!
//! Only the first page of an uploaded PDF is read. The extracted text is cut
//! down to its first [`FRONT_PAGE_WORDS`] whitespace-delimited words.
//!
//! MuPDF contexts are not thread-safe, so every document operation runs
//! under a process-wide lock. Async callers go through
//! [`extract_front_page_file`], which moves the work onto the blocking pool.

use std::path::{Path, PathBuf};

use mupdf::Document;
use parking_lot::Mutex;
use thiserror::Error;

/// Number of words kept from the first page
pub const FRONT_PAGE_WORDS: usize = 50;

const PDF_MIME: &str = "application/pdf";

/// Serializes all MuPDF access in the process
static MUPDF_LOCK: Mutex<()> = Mutex::new(());

/// Text extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to open PDF: {0}")]
    Open(String),

    #[error("PDF is password protected")]
    Encrypted,

    #[error("Failed to extract text: {0}")]
    Text(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction task failed: {0}")]
    Join(String),
}

/// Extract the front-page text of a PDF held in memory
///
/// A document with zero pages yields an empty string rather than an error.
/// Callers have always received `Ok("")` for such files, so the behaviour is
/// kept even though an empty document is arguably unreadable.
pub fn extract_front_page(data: &[u8]) -> Result<String, ExtractionError> {
    let _guard = MUPDF_LOCK.lock();

    let doc = Document::from_bytes(data, PDF_MIME)
        .map_err(|e| ExtractionError::Open(e.to_string()))?;

    if doc
        .needs_password()
        .map_err(|e| ExtractionError::Open(e.to_string()))?
    {
        return Err(ExtractionError::Encrypted);
    }

    let page_count = doc
        .page_count()
        .map_err(|e| ExtractionError::Open(e.to_string()))?;
    if page_count == 0 {
        return Ok(String::new());
    }

    let page = doc
        .load_page(0)
        .map_err(|e| ExtractionError::Text(e.to_string()))?;
    let text = page
        .to_text()
        .map_err(|e| ExtractionError::Text(e.to_string()))?;

    Ok(first_words(&text, FRONT_PAGE_WORDS))
}

/// Read a PDF from disk and extract its front-page text off the async runtime
pub async fn extract_front_page_file(path: &Path) -> Result<String, ExtractionError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "Extracting front page text");

    tokio::task::spawn_blocking(move || extract_front_page(&data))
        .await
        .map_err(|e| ExtractionError::Join(e.to_string()))?
}

/// Keep the first `limit` whitespace-delimited words, joined by single spaces
pub fn first_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}
