//! Route modules for Folio Server
//!
//! The user flow is four steps, each a full page load:
//! upload (`/`) → process (`/process/:filename`) → result (`/result/:id`)
//! → download (`/download/:id`). Any failure redirects back to `/` with a
//! flash message.

pub mod download;
pub mod health;
pub mod process;
pub mod result;
pub mod upload;

use std::path::PathBuf;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::SessionError;
use crate::session::SessionKey;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_upload = state.config().server.max_upload_bytes;

    Router::new()
        .merge(upload::router(max_upload))
        .merge(process::router())
        .merge(result::router())
        .merge(download::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve a session key to a path that still exists on disk
async fn existing_path(state: &AppState, key: SessionKey) -> Option<PathBuf> {
    let path = state.sessions().get(&key).await?;
    match tokio::fs::try_exists(&path).await {
        Ok(true) => Some(path),
        _ => {
            tracing::warn!(key = %key, path = %path.display(), "Session path no longer exists");
            None
        }
    }
}

/// Generated image path for a session, or an expired-session error
async fn generated_image(state: &AppState, session_id: &str) -> Result<PathBuf, SessionError> {
    existing_path(state, SessionKey::GeneratedImage(session_id.to_string()))
        .await
        .ok_or_else(|| SessionError::ImageExpired(session_id.to_string()))
}
