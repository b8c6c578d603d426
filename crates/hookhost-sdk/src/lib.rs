//! Hookhost SDK
//!
//! The export surface shared by the hookhost host programs and third-party
//! hook libraries. A hook is a `cdylib` that exports four well-known symbols:
//!
//! - `Version` -> `(program, version)` the hook was built for
//! - `ProtoSettings` -> zero-valued settings prototype (optional)
//! - `CLIFlags` -> settings prototype for flag-driven discovery (optional)
//! - `Load(settings)` -> callout carrier
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hookhost_sdk::prelude::*;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Settings {
//!     endpoint: String,
//! }
//!
//! struct Carrier {
//!     settings: Settings,
//! }
//!
//! impl CalloutCarrier for Carrier {
//!     fn close(&mut self) -> Result<(), HookError> {
//!         Ok(())
//!     }
//! }
//!
//! fn load(settings: Option<HookSettings>) -> Result<Box<dyn CalloutCarrier>, HookError> {
//!     let settings = decode::<Settings>(settings)?.unwrap_or_default();
//!     Ok(Box::new(Carrier { settings }))
//! }
//!
//! fn proto_settings() -> HookSettings {
//!     prototype::<Settings>()
//! }
//!
//! export_hook! {
//!     program: PROGRAM_AGENT,
//!     load: load,
//!     proto_settings: proto_settings,
//! }
//! ```
//!
//! Hooks are native Rust code called through the Rust ABI. A hook must be
//! compiled by the same toolchain and against the same SDK release as the
//! host; the host refuses any hook whose reported version differs from
//! [`VERSION`].

pub mod callouts;
pub mod carrier;
pub mod error;
#[macro_use]
pub mod macros;
pub mod settings;
pub mod symbols;

pub use carrier::{AsAny, CalloutCarrier, CalloutSpecification};
pub use error::HookError;
pub use settings::{HookSettings, SettingsError, Shape};
pub use symbols::{CliFlagsFn, ExportedSymbol, LoadFn, ProtoSettingsFn, Symbol, VersionFn};

/// Release version of the hook framework. Hooks and hosts must agree on it
/// exactly.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program identifier of the agent host.
pub const PROGRAM_AGENT: &str = "hookhost-agent";

/// Program identifier of the server host.
pub const PROGRAM_SERVER: &str = "hookhost-server";

/// Prelude module with common imports for hook authors.
pub mod prelude {
    pub use crate::callouts::agent::{
        BeforeForwardToServer, BeforeForwardToServerCallouts, ForwardToServerRequest,
    };
    pub use crate::callouts::server::{
        BeforeForwardToAgent, BeforeForwardToAgentCallouts, ForwardToAgentRequest,
    };
    pub use crate::carrier::{AsAny, CalloutCarrier, CalloutSpecification};
    pub use crate::error::HookError;
    pub use crate::settings::{decode, prototype, HookSettings, SettingsError};
    pub use crate::{PROGRAM_AGENT, PROGRAM_SERVER, VERSION};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;

    // Macros are automatically available due to #[macro_use]
    pub use crate::export_hook;
}
