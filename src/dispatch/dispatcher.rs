use std::sync::Arc;

use opentelemetry::KeyValue;

use crate::config::Config;
use crate::knowledge::{KNOWLEDGE, KnowledgeTable};
use crate::llm::{GenerateRequest, LlmClient};
use crate::risk::{self, RiskAssessment};
use crate::telemetry::metrics::DISPATCH_REQUESTS;

use super::prompts::build_prompt;
use super::{DispatchKind, DispatchResult};

/// Sends knowledge-grounded prompts to the text-generation provider.
///
/// Stateless between calls; every dispatch makes exactly one provider call
/// and reports failures as [`DispatchResult::Error`].
pub struct Dispatcher {
    llm: Arc<LlmClient>,
    knowledge: &'static KnowledgeTable,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Dispatcher {
    pub fn new(llm: Arc<LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            knowledge: &KNOWLEDGE,
            model: model.into(),
            temperature: 0.4,
            max_tokens: 2048,
        }
    }

    pub fn from_config(llm: Arc<LlmClient>, config: &Config) -> Self {
        Self {
            temperature: config.default_temperature,
            max_tokens: config.default_max_tokens,
            ..Self::new(llm, config.llm_model.clone())
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn knowledge(&self) -> &'static KnowledgeTable {
        self.knowledge
    }

    /// V-LO manifest. A risk assessment is attached when both climate
    /// observations are given.
    pub async fn logistics_manifest(
        &self,
        query: &str,
        temperature_anomaly: Option<f64>,
        rainfall_mm: Option<f64>,
    ) -> DispatchResult {
        let risk = match (temperature_anomaly, rainfall_mm) {
            (Some(t), Some(r)) => Some(risk::classify(t, r)),
            _ => None,
        };
        self.dispatch(DispatchKind::LogisticsManifest, query, risk)
            .await
    }

    pub async fn crisis_response(&self, current_situation: &str) -> DispatchResult {
        self.dispatch(DispatchKind::CrisisResponse, current_situation, None)
            .await
    }

    pub async fn epidemic_intelligence(&self, surveillance_data: &str) -> DispatchResult {
        self.dispatch(DispatchKind::EpidemicIntelligence, surveillance_data, None)
            .await
    }

    #[tracing::instrument(
        name = "dispatch",
        skip(self, free_text, risk),
        fields(
            dispatch.kind = kind.as_str(),
            dispatch.status,
            risk.percent = risk.map(|r| r.risk_percent),
        )
    )]
    pub async fn dispatch(
        &self,
        kind: DispatchKind,
        free_text: &str,
        risk: Option<RiskAssessment>,
    ) -> DispatchResult {
        let risk = risk.filter(|_| kind == DispatchKind::LogisticsManifest);
        let prompt = build_prompt(kind, free_text, self.knowledge, risk.as_ref());

        let req = GenerateRequest {
            model: self.model.clone(),
            system: String::new(),
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            operation: kind.as_str().to_string(),
        };

        let result = match self.llm.generate(&req).await {
            Ok(resp) => DispatchResult::success(kind, &resp.content, risk),
            Err(err) => {
                tracing::error!(kind = kind.as_str(), error = %err, "Dispatch failed");
                DispatchResult::failure(&err)
            }
        };

        tracing::Span::current().record("dispatch.status", result.status());
        DISPATCH_REQUESTS.add(
            1,
            &[
                KeyValue::new("dispatch.kind", kind.as_str()),
                KeyValue::new("dispatch.status", result.status()),
            ],
        );

        result
    }
}
