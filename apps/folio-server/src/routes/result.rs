//! Result Route
//!
//! GET /result/:session_id?prompt=<text> - Inline preview of the generated
//! image and the prompt that produced it.

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use base64::Engine;
use serde::Deserialize;

use super::generated_image;
use crate::error::Result;
use crate::html;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(default)]
    pub prompt: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/result/:session_id", get(result))
}

pub async fn result(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ResultQuery>,
) -> Result<Html<String>> {
    let image_path = generated_image(&state, &session_id).await?;

    let data = tokio::fs::read(&image_path).await?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&data);

    tracing::debug!(session_id = %session_id, bytes = data.len(), "Rendering result");

    Ok(Html(html::result_page(
        &session_id,
        &encoded,
        query.prompt.as_deref().unwrap_or_default(),
    )))
}
