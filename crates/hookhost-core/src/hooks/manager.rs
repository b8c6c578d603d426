//! Hook lifecycle of a host program.

use std::collections::HashMap;
use std::path::Path;

use hookhost_sdk::HookSettings;

use super::carrier::HookCarrier;
use super::executor::{CalloutDescriptor, HookExecutor};
use super::walker::HookWalker;
use crate::error::{combine_errors, Result};

/// Owns the executor of a host program: activates the hooks of its
/// directory at startup and closes them on shutdown.
///
/// Program specific managers ([`AgentHookManager`](super::AgentHookManager),
/// [`ServerHookManager`](super::ServerHookManager)) wrap it with one method
/// per callout.
#[derive(Debug)]
pub struct HookManager {
    executor: HookExecutor,
}

impl HookManager {
    pub fn new(descriptors: Vec<CalloutDescriptor>) -> Self {
        Self {
            executor: HookExecutor::new(descriptors),
        }
    }

    /// Load every compatible hook of `directory` and register the carriers.
    ///
    /// Nothing is registered if any hook fails to load.
    pub fn register_hooks_from_directory(
        &mut self,
        program: &str,
        directory: &Path,
        all_settings: &HashMap<String, HookSettings>,
    ) -> Result<()> {
        self.register_hooks_with(&HookWalker::new(), program, directory, all_settings)
    }

    /// Same as [`register_hooks_from_directory`](Self::register_hooks_from_directory)
    /// with a custom walker.
    pub fn register_hooks_with(
        &mut self,
        walker: &HookWalker,
        program: &str,
        directory: &Path,
        all_settings: &HashMap<String, HookSettings>,
    ) -> Result<()> {
        let carriers = walker.load_all_hooks(program, directory, all_settings)?;
        tracing::info!(
            category = "hooks",
            program = %program,
            directory = %directory.display(),
            count = carriers.len(),
            "Hooks loaded"
        );
        self.register_carriers(carriers);
        Ok(())
    }

    pub fn register_carriers(&mut self, carriers: Vec<HookCarrier>) {
        for carrier in carriers {
            self.executor.register_carrier(carrier);
        }
    }

    pub fn executor(&self) -> &HookExecutor {
        &self.executor
    }

    /// Close every registered carrier. All carriers are closed even if some
    /// fail; the failures are returned together.
    pub fn close(&mut self) -> Result<()> {
        let errors: Vec<String> = self
            .executor
            .unregister_all()
            .into_iter()
            .map(|(hook, e)| format!("{}: {}", hook, e))
            .collect();

        combine_errors("cannot close hook carriers", errors)
    }
}
