//! Callouts dispatched by the agent.

use serde::{Deserialize, Serialize};

use crate::carrier::{CalloutCarrier, CalloutSpecification};
use crate::error::HookError;

/// A command the agent is about to forward to the managed DHCP server over
/// HTTP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardToServerRequest {
    /// URL of the managed server's control endpoint.
    pub url: String,
    /// Raw command body.
    pub request: String,
}

/// Runs before the agent forwards a command to the managed server.
pub trait BeforeForwardToServerCallouts: Send + Sync {
    fn on_before_forward_to_server(&self, request: &ForwardToServerRequest) -> Result<(), HookError>;
}

/// Descriptor of [`BeforeForwardToServerCallouts`].
pub struct BeforeForwardToServer;

impl CalloutSpecification for BeforeForwardToServer {
    type Callouts = dyn BeforeForwardToServerCallouts;

    const NAME: &'static str = "before_forward_to_server";

    fn resolve(carrier: &dyn CalloutCarrier) -> Option<&Self::Callouts> {
        carrier.as_before_forward_to_server()
    }
}
