//! Prompt dispatch: knowledge table + caller text -> LLM -> result record.

pub mod dispatcher;
pub mod prompts;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::risk::RiskAssessment;

pub use dispatcher::Dispatcher;

/// East Africa Time, UTC+3 with no daylight saving.
pub const EAT_OFFSET_SECS: i32 = 3 * 3600;

pub fn east_africa_now() -> DateTime<FixedOffset> {
    let eat = FixedOffset::east_opt(EAT_OFFSET_SECS).expect("UTC+3 is a valid offset");
    Utc::now().with_timezone(&eat)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// V-LO three-step predictive logistics manifest.
    LogisticsManifest,
    /// ADIIT four-priority crisis response.
    CrisisResponse,
    /// Thirty-day epidemic intelligence forecast.
    EpidemicIntelligence,
}

impl DispatchKind {
    pub const ALL: [DispatchKind; 3] = [
        DispatchKind::LogisticsManifest,
        DispatchKind::CrisisResponse,
        DispatchKind::EpidemicIntelligence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchKind::LogisticsManifest => "logistics_manifest",
            DispatchKind::CrisisResponse => "crisis_response",
            DispatchKind::EpidemicIntelligence => "epidemic_intelligence",
        }
    }

    /// Agent tag reported alongside the reply, if the kind has one.
    pub fn agent_tag(&self) -> Option<&'static str> {
        match self {
            DispatchKind::LogisticsManifest => Some("V-LO"),
            DispatchKind::CrisisResponse => Some("ADIIT"),
            DispatchKind::EpidemicIntelligence => None,
        }
    }

    fn output(&self, text: String) -> DispatchOutput {
        match self {
            DispatchKind::LogisticsManifest => DispatchOutput::Manifest(text),
            DispatchKind::CrisisResponse => DispatchOutput::CrisisResponse(text),
            DispatchKind::EpidemicIntelligence => DispatchOutput::IntelligenceReport(text),
        }
    }
}

/// The generated text, keyed by the field name of its dispatch kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutput {
    Manifest(String),
    CrisisResponse(String),
    IntelligenceReport(String),
}

impl DispatchOutput {
    pub fn text(&self) -> &str {
        match self {
            DispatchOutput::Manifest(text)
            | DispatchOutput::CrisisResponse(text)
            | DispatchOutput::IntelligenceReport(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSuccess {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<&'static str>,
    #[serde(flatten)]
    pub output: DispatchOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
    pub generated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchResult {
    Success(DispatchSuccess),
    Error { message: String },
}

impl DispatchResult {
    pub(crate) fn success(
        kind: DispatchKind,
        reply: &str,
        risk_assessment: Option<RiskAssessment>,
    ) -> Self {
        DispatchResult::Success(DispatchSuccess {
            agent: kind.agent_tag(),
            output: kind.output(reply.trim().to_string()),
            risk_assessment,
            generated_at: east_africa_now(),
        })
    }

    pub(crate) fn failure(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let message = if message.trim().is_empty() {
            "text-generation call failed".to_string()
        } else {
            message
        };
        DispatchResult::Error { message }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            DispatchResult::Success(_) => "success",
            DispatchResult::Error { .. } => "error",
        }
    }

    /// Generated text on success.
    pub fn text(&self) -> Option<&str> {
        match self {
            DispatchResult::Success(success) => Some(success.output.text()),
            DispatchResult::Error { .. } => None,
        }
    }

    /// Failure message on error.
    pub fn message(&self) -> Option<&str> {
        match self {
            DispatchResult::Success(_) => None,
            DispatchResult::Error { message } => Some(message),
        }
    }
}
