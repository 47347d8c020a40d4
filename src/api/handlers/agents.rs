use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::agent::{AgentName, AgentState};

fn parse_name(name: String) -> Result<AgentName, ApiError> {
    AgentName::new(name).map_err(|e| ApiError::bad_request(format!("Invalid agent name: {}", e)))
}

/// List registered agents
///
/// GET /agents
pub async fn list_agents(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let members = state.rendezvous.registry().members().await?;
    Ok(Json(members))
}

/// Get the command record addressed to an agent
///
/// GET /agents/:name/command
pub async fn get_command(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AgentState>, ApiError> {
    let name = parse_name(name)?;
    let record = state
        .rendezvous
        .command_record(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No command record for: {}", name)))?;

    Ok(Json(record))
}

/// Get the last raw state pushed by an agent
///
/// GET /agents/:name/state
pub async fn get_last_push(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let name = parse_name(name)?;
    let raw = state
        .rendezvous
        .last_push(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No state pushed by: {}", name)))?;

    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        raw,
    )
        .into_response())
}
