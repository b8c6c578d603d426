//! Callout carriers and callout interface descriptors.

use std::any::Any;

use crate::callouts::agent::BeforeForwardToServerCallouts;
use crate::callouts::server::BeforeForwardToAgentCallouts;
use crate::error::HookError;

/// Access to the concrete type behind a trait object.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The long-lived object a hook's `Load` returns.
///
/// A carrier implements any subset of the callout interfaces. The accessor of
/// an interface it implements returns `Some(self)`; the rest keep the default
/// `None`.
///
/// ```rust,ignore
/// impl CalloutCarrier for Carrier {
///     fn close(&mut self) -> Result<(), HookError> {
///         Ok(())
///     }
///
///     fn as_before_forward_to_server(
///         &self,
///     ) -> Option<&(dyn BeforeForwardToServerCallouts + 'static)> {
///         Some(self)
///     }
/// }
/// ```
pub trait CalloutCarrier: AsAny + Send + Sync {
    /// Release every resource the carrier holds. Called once, when the host
    /// retires its hooks.
    fn close(&mut self) -> Result<(), HookError>;

    fn as_before_forward_to_server(
        &self,
    ) -> Option<&(dyn BeforeForwardToServerCallouts + 'static)> {
        None
    }

    fn as_before_forward_to_agent(&self) -> Option<&(dyn BeforeForwardToAgentCallouts + 'static)> {
        None
    }
}

/// Describes one callout interface a host may dispatch to.
///
/// Implemented by a zero-sized marker type per interface; the marker's
/// `TypeId` is the interface identifier.
pub trait CalloutSpecification: 'static {
    /// The callout trait object, e.g. `dyn BeforeForwardToServerCallouts`.
    type Callouts: ?Sized + Send + Sync;

    /// Human-readable interface name used in logs.
    const NAME: &'static str;

    /// Capability check: the carrier's implementation of this interface, if
    /// any.
    fn resolve(carrier: &dyn CalloutCarrier) -> Option<&Self::Callouts>;
}
