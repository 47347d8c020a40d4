use axum::{extract::State, http::StatusCode};

use crate::api::errors::ApiError;
use crate::api::state::AppState;

/// Flush the mailbox, dropping the registry and every agent slot
///
/// DELETE /admin/mailbox
pub async fn flush_mailbox(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let removed = state.rendezvous.flush().await?;
    tracing::warn!(removed, "Mailbox flushed by administrative request");
    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
