use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.config.otel_service_name,
        "environment": state.config.environment,
        "provider": state.config.llm_provider,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
