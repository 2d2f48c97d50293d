//! Processing Route
//!
//! GET|POST /process/:filename?session_id=<id>
//!
//! Runs extraction, prompt building and generation in sequence for the
//! uploaded PDF, stores the image and redirects to the result page.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::existing_path;
use crate::error::{Result, SessionError};
use crate::extract::extract_front_page_file;
use crate::flash;
use crate::prompt::build_prompt;
use crate::session::SessionKey;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/process/:filename", get(process).post(process))
}

pub async fn process(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<ProcessQuery>,
) -> Result<Response> {
    let session_id = query.session_id.unwrap_or_default();

    let pdf_path = existing_path(&state, SessionKey::UploadedPdf(session_id.clone()))
        .await
        .ok_or_else(|| SessionError::FileExpired(session_id.clone()))?;

    tracing::debug!(
        session_id = %session_id,
        filename = %filename,
        path = %pdf_path.display(),
        "Processing upload"
    );

    let text = extract_front_page_file(&pdf_path).await?;
    tracing::debug!(session_id = %session_id, words = text.split_whitespace().count(), "Front page extracted");

    let prompt = build_prompt(&text);

    let generator = state.generator();
    tracing::debug!(session_id = %session_id, provider = generator.name(), "Generating image");
    let png = generator.generate(&prompt).await?;

    let image_path = state.workspace().write_image(&session_id, &png).await?;
    state
        .sessions()
        .put(SessionKey::GeneratedImage(session_id.clone()), image_path)
        .await;

    tracing::info!(session_id = %session_id, bytes = png.len(), "Cover image generated");

    Ok(flash::redirect(&format!(
        "/result/{}?prompt={}",
        urlencoding::encode(&session_id),
        urlencoding::encode(&prompt)
    )))
}
