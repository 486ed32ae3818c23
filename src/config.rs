use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub llm_provider: String,
    pub llm_model: String,
    pub ollama_base_url: String,
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
    pub otel_disabled: bool,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, applying the documented defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            port: var("APP_PORT", "8080")
                .parse()
                .context("APP_PORT must be a number")?,
            environment: var("APP_ENVIRONMENT", "development"),
            llm_provider: var("LLM_PROVIDER", "google"),
            llm_model: var("LLM_MODEL", "gemini-2.0-flash-exp"),
            ollama_base_url: var("OLLAMA_BASE_URL", "http://localhost:11434"),
            openai_api_key: lookup("OPENAI_API_KEY"),
            google_api_key: lookup("GOOGLE_API_KEY"),
            otel_service_name: var("OTEL_SERVICE_NAME", "turkana-health-agent"),
            otel_exporter_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            otel_disabled: lookup("OTEL_SDK_DISABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            default_temperature: var("DEFAULT_TEMPERATURE", "0.4")
                .parse()
                .context("DEFAULT_TEMPERATURE must be a number")?,
            default_max_tokens: var("DEFAULT_MAX_TOKENS", "2048")
                .parse()
                .context("DEFAULT_MAX_TOKENS must be a number")?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
impl Config {
    /// Offline configuration for unit tests; never reads the environment.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            environment: "test".to_string(),
            llm_provider: "google".to_string(),
            llm_model: "gemini-2.0-flash-exp".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            openai_api_key: None,
            google_api_key: None,
            otel_service_name: "turkana-health-agent".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
            otel_disabled: true,
            default_temperature: 0.4,
            default_max_tokens: 2048,
        }
    }
}
