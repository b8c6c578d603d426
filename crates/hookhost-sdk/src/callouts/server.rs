//! Callouts dispatched by the server.

use serde::{Deserialize, Serialize};

use crate::carrier::{CalloutCarrier, CalloutSpecification};
use crate::error::HookError;

/// A command the server is about to send to one of its agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardToAgentRequest {
    /// Address of the agent, `host:port`.
    pub agent_address: String,
    /// Identifier of the daemon the command targets.
    pub daemon: String,
    /// Raw command body.
    pub command: String,
}

/// Runs before the server sends a command to an agent.
pub trait BeforeForwardToAgentCallouts: Send + Sync {
    fn on_before_forward_to_agent(&self, request: &ForwardToAgentRequest) -> Result<(), HookError>;
}

/// Descriptor of [`BeforeForwardToAgentCallouts`].
pub struct BeforeForwardToAgent;

impl CalloutSpecification for BeforeForwardToAgent {
    type Callouts = dyn BeforeForwardToAgentCallouts;

    const NAME: &'static str = "before_forward_to_agent";

    fn resolve(carrier: &dyn CalloutCarrier) -> Option<&Self::Callouts> {
        carrier.as_before_forward_to_agent()
    }
}
