//! Error types for Folio Server
//!
//! Every stage has its own error enum. Handlers propagate them with `?`
//! into [`AppError`], which logs the failure and turns it into a flash
//! message plus a redirect to the upload page. No error reaches the client
//! as a server fault.

use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::extract::ExtractionError;
use crate::flash;
use crate::generate::GenerationError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Upload validation errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Not a PDF file: {0}")]
    NotPdf(String),

    #[error("Failed to read upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Failed to save upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Lookups for sessions that were never created or were already purged
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Uploaded file for session {0} not found or expired")]
    FileExpired(String),

    #[error("Generated image for session {0} not found or expired")]
    ImageExpired(String),
}

/// Orchestrator error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Failed to send download: {0}")]
    Download(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short message shown to the user on the upload page
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Upload(UploadError::NoFilePart) => "No file part",
            AppError::Upload(UploadError::NoSelectedFile) => "No selected file",
            AppError::Upload(UploadError::NotPdf(_)) => "Please upload a PDF file",
            AppError::Upload(UploadError::Multipart(_)) => "Error reading upload",
            AppError::Upload(UploadError::Io(_)) => "Error saving upload",
            AppError::Session(SessionError::FileExpired(_)) => "File not found or has expired",
            AppError::Session(SessionError::ImageExpired(_)) => "Image not found or has expired",
            AppError::Extraction(_) => "Error processing PDF file",
            AppError::Generation(_) => "Error generating image",
            AppError::Download(_) => "Error downloading image",
            AppError::Io(_) => "Error processing file",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upload(UploadError::Multipart(_) | UploadError::Io(_))
            | AppError::Extraction(_)
            | AppError::Generation(_)
            | AppError::Download(_)
            | AppError::Io(_) => tracing::error!("Request failed: {}", self),
            AppError::Upload(_) | AppError::Session(_) => tracing::warn!("{}", self),
        }

        flash::redirect_with_flash("/", self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::from(GenerationError::MissingApiKey).user_message(),
            "Error generating image"
        );
        assert_eq!(
            AppError::from(SessionError::ImageExpired("x".into())).user_message(),
            "Image not found or has expired"
        );
        assert_eq!(
            AppError::from(UploadError::NotPdf("a.txt".into())).user_message(),
            "Please upload a PDF file"
        );
    }

    #[test]
    fn test_error_redirects_home() {
        let response = AppError::from(ExtractionError::Encrypted).into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Error%20processing%20PDF%20file"));
    }
}
