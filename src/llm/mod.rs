pub mod client;
pub mod gemini;
pub mod openai;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

pub use client::LlmClient;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub operation: String,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
    pub provider: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
    fn name(&self) -> &str;
}

pub static PROVIDER_SERVERS: LazyLock<HashMap<&str, (&str, i64)>> = LazyLock::new(|| {
    HashMap::from([
        ("google", ("generativelanguage.googleapis.com", 443_i64)),
        ("openai", ("api.openai.com", 443)),
        ("ollama", ("localhost", 11434)),
    ])
});

/// Builds the configured text-generation provider.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match config.llm_provider.as_str() {
        "google" => Arc::new(gemini::GeminiProvider::new(
            config.google_api_key.as_deref().unwrap_or(""),
        )),
        "openai" => Arc::new(openai::OpenAIProvider::new(
            config.openai_api_key.as_deref().unwrap_or(""),
        )),
        "ollama" => Arc::new(openai::OpenAIProvider::new_ollama(&config.ollama_base_url)),
        other => anyhow::bail!(
            "unsupported LLM_PROVIDER {other:?} (expected google, openai or ollama)"
        ),
    };
    Ok(provider)
}
