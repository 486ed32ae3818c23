use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::Value;

use crate::AppState;
use crate::agent::AgentCard;
use crate::dispatch::DispatchResult;
use crate::error::AppResult;
use crate::knowledge::KnowledgeTable;

pub async fn get_agent(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.agent.card())
}

pub async fn get_knowledge(State(state): State<AppState>) -> Json<&'static KnowledgeTable> {
    Json(state.agent.dispatcher().knowledge())
}

/// Provider failures are still `200 OK` with `"status": "error"` in the body.
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    args: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<DispatchResult>> {
    let Json(args) = args?;
    let result = state.agent.invoke(&name, args).await?;
    Ok(Json(result))
}
