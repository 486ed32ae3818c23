pub mod agent;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod risk;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub agent: Arc<agent::Agent>,
}

/// Wires the configured provider, dispatcher and agent together.
pub fn build_agent(config: &Config) -> anyhow::Result<agent::Agent> {
    let provider = llm::provider_from_config(config)?;
    let llm_client = Arc::new(llm::LlmClient::new(provider));
    let dispatcher = Arc::new(dispatch::Dispatcher::from_config(llm_client, config));
    Ok(agent::Agent::new(dispatcher))
}
