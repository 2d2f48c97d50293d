//! Upload Routes
//!
//! - GET / - Upload form, showing any pending flash message
//! - POST / - Accept a PDF in the `pdf_file` field and start a session

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::error::{Result, UploadError};
use crate::flash;
use crate::html;
use crate::session::{mint_session_id, SessionKey};
use crate::state::AppState;
use crate::workspace::safe_file_name;

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "pdf_file";

/// Create the upload router, capping request bodies at `max_upload` bytes
pub fn router(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(upload))
        .layer(DefaultBodyLimit::max(max_upload))
}

/// GET /
pub async fn index(headers: HeaderMap) -> Response {
    let message = flash::take(&headers);
    let mut response = Html(html::index_page(message.as_deref())).into_response();

    if message.is_some() {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, flash::clear_cookie());
    }
    response
}

/// POST /
///
/// Saves the file under a fresh session and redirects to processing.
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload is not multipart: {}", e);
        UploadError::NoFilePart
    })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(UploadError::from)?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) = upload.ok_or(UploadError::NoFilePart)?;

    if file_name.is_empty() {
        return Err(UploadError::NoSelectedFile.into());
    }
    if !is_pdf_name(&file_name) {
        return Err(UploadError::NotPdf(file_name).into());
    }

    let session_id = mint_session_id();
    let path = state
        .workspace()
        .save_upload(&session_id, &file_name, &data)
        .await
        .map_err(UploadError::from)?;

    tracing::info!(
        session_id = %session_id,
        file_name = %file_name,
        bytes = data.len(),
        path = %path.display(),
        "Upload saved"
    );

    state
        .sessions()
        .put(SessionKey::UploadedPdf(session_id.clone()), path)
        .await;

    Ok(flash::redirect(&format!(
        "/process/{}?session_id={}",
        urlencoding::encode(&safe_file_name(&file_name)),
        urlencoding::encode(&session_id)
    )))
}

fn is_pdf_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}
