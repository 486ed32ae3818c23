//! The hosted agent: identity, instruction and tool list.

pub mod tools;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::dispatch::{DispatchResult, Dispatcher};

pub use tools::{Tool, ToolError, ToolRegistry, ToolSchema};

pub const AGENT_NAME: &str = "turkana_health_agent";

pub const AGENT_DESCRIPTION: &str = "V-LO + ADIIT: AI for Turkana Public Health Emergency";

pub const AGENT_INSTRUCTION: &str = "You are the unified AI agent for Turkana County Health Crisis.
Your mission: Save lives using data, climate, logistics, and community.

TOOLS:
1. V-LO Manifest (3-step predictive response)
2. ADIIT Crisis Response (4-pillar orchestration)
3. Epidemic Intelligence (30-day forecast)

Always respond with PRACTICAL, ACTIONABLE, LIFE-SAVING advice.";

/// What an agent host sees when it discovers this agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentCard {
    pub name: &'static str,
    pub model: String,
    pub description: &'static str,
    pub instruction: &'static str,
    pub tools: Vec<ToolSchema>,
}

pub struct Agent {
    dispatcher: Arc<Dispatcher>,
    tools: ToolRegistry,
}

impl Agent {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        let tools = ToolRegistry::with_dispatch_tools(dispatcher.clone());
        Self { dispatcher, tools }
    }

    pub fn card(&self) -> AgentCard {
        AgentCard {
            name: AGENT_NAME,
            model: self.dispatcher.model().to_string(),
            description: AGENT_DESCRIPTION,
            instruction: AGENT_INSTRUCTION,
            tools: self.tools.schemas(),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    #[tracing::instrument(name = "agent.invoke", skip(self, args), fields(agent.name = AGENT_NAME))]
    pub async fn invoke(&self, tool: &str, args: Value) -> Result<DispatchResult, ToolError> {
        self.tools.invoke(tool, args).await
    }
}
