//! Callouts of the agent.

use std::ops::{Deref, DerefMut};

use hookhost_sdk::callouts::agent::{BeforeForwardToServer, ForwardToServerRequest};

use super::executor::CalloutDescriptor;
use super::manager::HookManager;
use crate::error::{combine_errors, Result};

/// Hook manager of the agent, with one method per agent callout.
#[derive(Debug)]
pub struct AgentHookManager {
    manager: HookManager,
}

impl Default for AgentHookManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentHookManager {
    pub fn new() -> Self {
        Self {
            manager: HookManager::new(vec![CalloutDescriptor::of::<BeforeForwardToServer>()]),
        }
    }

    /// Run before the agent forwards a command to the managed server.
    pub fn on_before_forward_to_server(&self, request: &ForwardToServerRequest) -> Result<()> {
        let errors = self
            .executor()
            .call_sequential::<BeforeForwardToServer, _, _>(|callouts| {
                callouts.on_before_forward_to_server(request)
            });

        combine_errors("error in the on_before_forward_to_server callout", errors)
    }
}

impl Deref for AgentHookManager {
    type Target = HookManager;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

impl DerefMut for AgentHookManager {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.manager
    }
}
