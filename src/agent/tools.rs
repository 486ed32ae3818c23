//! Tools the agent host can enumerate and invoke.
//!
//! Each tool wraps one dispatch kind. Arguments arrive as a JSON object and
//! are decoded against the schema returned by [`Tool::parameters`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use thiserror::Error;

use crate::dispatch::{DispatchResult, Dispatcher};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// Name, description and JSON Schema of a tool, as shown to the host.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters(&self) -> Value;

    /// Runs the tool. Provider failures come back as an error
    /// [`DispatchResult`]; only bad arguments are a [`ToolError`].
    async fn invoke(&self, args: Value) -> Result<DispatchResult, ToolError>;

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

fn decode<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Ordered set of tools; listing order is registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the three dispatch tools.
    pub fn with_dispatch_tools(dispatcher: Arc<Dispatcher>) -> Self {
        let mut registry = Self::new();
        registry.register(LogisticsManifestTool {
            dispatcher: dispatcher.clone(),
        });
        registry.register(CrisisResponseTool {
            dispatcher: dispatcher.clone(),
        });
        registry.register(EpidemicIntelligenceTool { dispatcher });
        registry
    }

    /// Adds a tool, replacing any tool with the same name in place.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        let existing = self.tools.iter().position(|t| t.name() == tool.name());
        match existing {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn invoke(&self, name: &str, args: Value) -> Result<DispatchResult, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(args).await
    }
}

// ============================================================================
// Dispatch tools
// ============================================================================

pub struct LogisticsManifestTool {
    dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Deserialize)]
struct ManifestArgs {
    query: String,
    #[serde(default)]
    temperature_anomaly: Option<f64>,
    #[serde(default)]
    rainfall_mm: Option<f64>,
}

#[async_trait]
impl Tool for LogisticsManifestTool {
    fn name(&self) -> &str {
        "logistics_manifest"
    }

    fn description(&self) -> &str {
        "V-LO 3-step predictive logistics manifest (truck route and supplies, \
         SMS/CHP alerts to herders, vector control). Optionally scores malaria \
         epidemic risk from a max-temperature anomaly and monthly rainfall."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Operational question, e.g. \"June 2025 surge in Loima?\""
                },
                "temperature_anomaly": {
                    "type": "number",
                    "description": "Max-temperature anomaly in degrees Celsius"
                },
                "rainfall_mm": {
                    "type": "number",
                    "description": "Monthly rainfall in millimetres"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<DispatchResult, ToolError> {
        let args: ManifestArgs = decode(args)?;
        Ok(self
            .dispatcher
            .logistics_manifest(&args.query, args.temperature_anomaly, args.rainfall_mm)
            .await)
    }
}

pub struct CrisisResponseTool {
    dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Deserialize)]
struct CrisisArgs {
    current_situation: String,
}

#[async_trait]
impl Tool for CrisisResponseTool {
    fn name(&self) -> &str {
        "crisis_response"
    }

    fn description(&self) -> &str {
        "ADIIT 4-pillar crisis response: drug resistance and expiry, logistics, \
         clinical adherence and vector intelligence, with a lives-saved estimate."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "current_situation": {
                    "type": "string",
                    "description": "Description of the unfolding crisis"
                }
            },
            "required": ["current_situation"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<DispatchResult, ToolError> {
        let args: CrisisArgs = decode(args)?;
        Ok(self.dispatcher.crisis_response(&args.current_situation).await)
    }
}

pub struct EpidemicIntelligenceTool {
    dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Deserialize)]
struct SurveillanceArgs {
    surveillance_data: String,
}

#[async_trait]
impl Tool for EpidemicIntelligenceTool {
    fn name(&self) -> &str {
        "epidemic_intelligence"
    }

    fn description(&self) -> &str {
        "30-day epidemic intelligence forecast: vector dynamics, drug resistance, \
         nomadic mobility and multi-disease hotspots, with predicted risk zones."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "surveillance_data": {
                    "type": "string",
                    "description": "Latest surveillance observations"
                }
            },
            "required": ["surveillance_data"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<DispatchResult, ToolError> {
        let args: SurveillanceArgs = decode(args)?;
        Ok(self
            .dispatcher
            .epidemic_intelligence(&args.surveillance_data)
            .await)
    }
}
