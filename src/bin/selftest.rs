//! Smoke test against the configured provider.
//!
//! Prints the agent identity, one sample risk assessment and one sample
//! logistics manifest. Output is informational; the exit status only
//! reflects startup failures.

use turkana_health_agent::knowledge::KNOWLEDGE;
use turkana_health_agent::risk::classify;
use turkana_health_agent::telemetry::init_telemetry;
use turkana_health_agent::{Config, build_agent};

const SAMPLE_QUERY: &str = "June 2025 surge in Loima?";
const SAMPLE_TEMPERATURE_ANOMALY: f64 = 2.0;
const SAMPLE_RAINFALL_MM: f64 = 293.2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let telemetry_guard = init_telemetry(&config)?;

    let agent = build_agent(&config)?;
    let card = agent.card();
    let tool_names: Vec<&str> = card.tools.iter().map(|t| t.name.as_str()).collect();

    println!("V-LO + ADIIT AGENT INITIALIZED");
    println!("Name: {}", card.name);
    println!("Model: {} ({})", card.model, config.llm_provider);
    println!("Tools: {} ({})", tool_names.len(), tool_names.join(", "));
    println!(
        "Mission: Save lives across {} kala-azar cases in Turkana",
        KNOWLEDGE.kala_azar.cases_2025
    );

    let risk = classify(SAMPLE_TEMPERATURE_ANOMALY, SAMPLE_RAINFALL_MM);
    println!(
        "\nTEST RISK MODEL (tmax anomaly {SAMPLE_TEMPERATURE_ANOMALY}, rainfall {SAMPLE_RAINFALL_MM}mm):"
    );
    println!("{}", serde_json::to_string_pretty(&risk)?);

    let result = agent
        .dispatcher()
        .logistics_manifest(
            SAMPLE_QUERY,
            Some(SAMPLE_TEMPERATURE_ANOMALY),
            Some(SAMPLE_RAINFALL_MM),
        )
        .await;

    println!("\nTEST V-LO MANIFEST [{}]:", result.status());
    println!(
        "{}",
        result.text().or(result.message()).unwrap_or_default()
    );

    telemetry_guard.shutdown();
    Ok(())
}
