pub mod agent;
pub mod health;
pub mod risk;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/agent", get(agent::get_agent))
        .route("/api/knowledge", get(agent::get_knowledge))
        .route("/api/risk", post(risk::assess_risk))
        .route("/api/tools/{name}", post(agent::invoke_tool))
        .with_state(state)
}
