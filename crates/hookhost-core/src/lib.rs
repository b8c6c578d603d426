//! Hook framework of the hookhost programs.
//!
//! Discovers native hook libraries in a per-program directory, checks that
//! they were built for the running program and framework release, negotiates
//! their settings, activates them and dispatches callouts to the resulting
//! carriers.
//!
//! ```rust,ignore
//! use hookhost_core::prelude::*;
//!
//! let config = HooksConfig::from_file("/etc/hookhost/agent.toml")?;
//! let directory = config.directory_for(PROGRAM_AGENT)?;
//!
//! let walker = HookWalker::new();
//! let prototypes = walker.collect_proto_settings(PROGRAM_AGENT, &directory)?;
//! let settings = resolve_settings(&prototypes, &config.settings)?;
//!
//! let mut hooks = AgentHookManager::new();
//! hooks.register_hooks_with(&walker, PROGRAM_AGENT, &directory, &settings)?;
//!
//! hooks.on_before_forward_to_server(&request)?;
//! hooks.close()?;
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod settings;

pub use error::{combine_errors, Error, Result};
pub use hooks::{
    AgentHookManager, CalloutDescriptor, HookCarrier, HookExecutor, HookManager, HookWalker,
    LibraryManager, ServerHookManager,
};

/// Re-exports commonly used types.
pub mod prelude {
    // Configuration
    pub use crate::config::{defaults, env_vars, hook_directory, HooksConfig};

    // Error handling
    pub use crate::error::{combine_errors, Error, Result};

    // Hooks
    pub use crate::hooks::{
        check_library_compatibility, AgentHookManager, CalloutDescriptor, HookCarrier,
        HookExecutor, HookInspection, HookManager, HookWalker, InspectionStatus, LibraryManager,
        ServerHookManager,
    };

    // Settings
    pub use crate::settings::{apply_overrides, env_overrides, resolve_settings};

    pub use hookhost_sdk::{HookSettings, PROGRAM_AGENT, PROGRAM_SERVER, VERSION};
}
