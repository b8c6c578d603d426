//! Callouts of the server.

use std::ops::{Deref, DerefMut};

use hookhost_sdk::callouts::server::{BeforeForwardToAgent, ForwardToAgentRequest};

use super::executor::CalloutDescriptor;
use super::manager::HookManager;
use crate::error::{combine_errors, Result};

/// Hook manager of the server, with one method per server callout.
#[derive(Debug)]
pub struct ServerHookManager {
    manager: HookManager,
}

impl Default for ServerHookManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerHookManager {
    pub fn new() -> Self {
        Self {
            manager: HookManager::new(vec![CalloutDescriptor::of::<BeforeForwardToAgent>()]),
        }
    }

    /// Run before the server sends a command to an agent.
    pub fn on_before_forward_to_agent(&self, request: &ForwardToAgentRequest) -> Result<()> {
        let errors = self
            .executor()
            .call_sequential::<BeforeForwardToAgent, _, _>(|callouts| {
                callouts.on_before_forward_to_agent(request)
            });

        combine_errors("error in the on_before_forward_to_agent callout", errors)
    }
}

impl Deref for ServerHookManager {
    type Target = HookManager;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

impl DerefMut for ServerHookManager {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.manager
    }
}
