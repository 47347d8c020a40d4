use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::agent::AgentState;

/// Velocity returned by the echo endpoint
pub const ECHO_V: f64 = 1.0;
/// Angular velocity returned by the echo endpoint
pub const ECHO_W: f64 = 0.5;

/// Reads a request body as an agent state, keeping the raw text
///
/// Runs before any state is touched, so a rejected body leaves the mailbox
/// unchanged.
fn decode_state(body: Result<Bytes, BytesRejection>) -> Result<(String, AgentState), ApiError> {
    let body = body?;
    let raw = String::from_utf8(body.to_vec())
        .map_err(|_| ApiError::bad_request("Request body is not valid UTF-8"))?;
    let state = AgentState::from_payload(&raw).map_err(|e| {
        tracing::warn!(error = %e, "Error decoding JSON");
        ApiError::bad_request("Invalid JSON data")
    })?;
    Ok((raw, state))
}

/// Push agent state and collect a pending command
///
/// POST /demo/string
pub async fn push_state(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AgentState>, ApiError> {
    let (raw, pushed) = decode_state(body)?;

    let outcome = state.rendezvous.push(&raw, pushed).await?;
    tracing::info!(
        agent = %outcome.response.name,
        slot = %outcome.observed,
        delivered = outcome.delivered(),
        "Rendezvous complete"
    );

    Ok(Json(outcome.response))
}

/// Echo agent state with fixed velocities
///
/// POST /demo/hash
pub async fn echo_state(body: Result<Bytes, BytesRejection>) -> Result<Json<AgentState>, ApiError> {
    let (_, mut message) = decode_state(body)?;
    message.trace_fields("echo");

    message.v = ECHO_V;
    message.w = ECHO_W;

    Ok(Json(message))
}

/// Queue a command for the agent named in the body
///
/// POST /demo/command
pub async fn queue_command(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<AgentState>), ApiError> {
    let (_, command) = decode_state(body)?;

    let record = state.rendezvous.queue_command(command).await?;

    Ok((StatusCode::ACCEPTED, Json(record)))
}
