//! Callout interfaces, grouped by the host program that dispatches them.

pub mod agent;
pub mod server;
