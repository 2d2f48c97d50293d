//! Download Routes
//!
//! - GET /download/:session_id - Send the generated image as an attachment,
//!   then purge the session
//! - POST /cleanup/:session_id - Purge a session without downloading

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use super::generated_image;
use crate::error::{AppError, Result};
use crate::flash;
use crate::state::AppState;

/// File name offered to the browser
pub const DOWNLOAD_FILE_NAME: &str = "course_image.png";

/// Create the download router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/download/:session_id", get(download))
        .route("/cleanup/:session_id", post(cleanup))
}

pub async fn download(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response> {
    let image_path = generated_image(&state, &session_id).await?;

    // Read fully before purging so a failed read leaves the session intact
    let data = tokio::fs::read(&image_path)
        .await
        .map_err(AppError::Download)?;

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
            ),
        ],
        Body::from(data),
    )
        .into_response();

    tracing::info!(session_id = %session_id, "Image downloaded");
    state.sessions().purge(&session_id).await;

    Ok(response)
}

pub async fn cleanup(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    state.sessions().purge(&session_id).await;
    flash::redirect("/")
}
