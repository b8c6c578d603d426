//! Hook framework.
//!
//! ```text
//! directory ──► HookWalker ──► LibraryManager ──► compatibility gate
//!                   │                                   │
//!                   │ collect_proto_settings            │ load_all_hooks
//!                   ▼                                   ▼
//!             prototypes ──► resolve_settings ──► Load(settings) ──► HookCarrier
//!                                                                       │
//!                                                                       ▼
//!                                  AgentHookManager / ServerHookManager ──► HookExecutor
//! ```
//!
//! Discovery and activation fail closed: one unopenable, foreign or failing
//! hook stops the whole directory from loading. Dispatch and teardown fail
//! open: every carrier is called (or closed) and the failures are reported
//! together.

mod agent;
mod carrier;
mod compat;
mod executor;
mod library;
mod manager;
mod negotiator;
mod server;
mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::AgentHookManager;
pub use carrier::HookCarrier;
pub use compat::check_library_compatibility;
pub use executor::{CalloutDescriptor, HookExecutor};
pub use library::{hook_name, LibraryManager, NativeLibrary, StaticLibrary, SymbolLookup};
pub use manager::HookManager;
pub use server::ServerHookManager;
pub use walker::{HookInspection, HookLookup, HookWalker, InspectionStatus, SystemLookup};
