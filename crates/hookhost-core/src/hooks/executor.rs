//! Carrier registry and callout dispatch.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use hookhost_sdk::{CalloutCarrier, CalloutSpecification, HookError};

use super::carrier::HookCarrier;

/// Identifies one callout interface a dispatcher recognizes.
#[derive(Clone, Copy)]
pub struct CalloutDescriptor {
    id: TypeId,
    name: &'static str,
    implemented_by: fn(&dyn CalloutCarrier) -> bool,
}

impl CalloutDescriptor {
    pub fn of<S: CalloutSpecification>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: S::NAME,
            implemented_by: implements::<S>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn supported_by(&self, carrier: &dyn CalloutCarrier) -> bool {
        (self.implemented_by)(carrier)
    }
}

fn implements<S: CalloutSpecification>(carrier: &dyn CalloutCarrier) -> bool {
    S::resolve(carrier).is_some()
}

impl fmt::Debug for CalloutDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CalloutDescriptor").field(&self.name).finish()
    }
}

/// Registry of activated carriers, indexed per recognized callout interface.
///
/// The recognized interfaces are fixed at construction. Each registered
/// carrier is checked against every one of them once; dispatch walks the
/// cached index in registration order. Dispatch only borrows the executor, so
/// a fully registered executor can serve concurrent callers.
pub struct HookExecutor {
    descriptors: Vec<CalloutDescriptor>,
    carriers: Vec<HookCarrier>,
    registered: HashMap<TypeId, Vec<usize>>,
}

impl HookExecutor {
    pub fn new(descriptors: Vec<CalloutDescriptor>) -> Self {
        let mut unique: Vec<CalloutDescriptor> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if !unique.iter().any(|known| known.id == descriptor.id) {
                unique.push(descriptor);
            }
        }

        Self {
            descriptors: unique,
            carriers: Vec::new(),
            registered: HashMap::new(),
        }
    }

    /// Add a carrier and index it under every recognized interface it
    /// implements. A carrier implementing none of them is still kept, so it
    /// is closed on teardown.
    pub fn register_carrier(&mut self, carrier: HookCarrier) {
        let index = self.carriers.len();
        let mut callouts = Vec::new();

        for descriptor in &self.descriptors {
            if descriptor.supported_by(carrier.carrier()) {
                self.registered.entry(descriptor.id).or_default().push(index);
                callouts.push(descriptor.name);
            }
        }

        if callouts.is_empty() {
            tracing::warn!(category = "hooks", hook = %carrier.name(), "Hook implements no recognized callout");
        } else {
            tracing::info!(category = "hooks", hook = %carrier.name(), callouts = ?callouts, "Hook registered");
        }

        self.carriers.push(carrier);
    }

    /// Names of the recognized callout interfaces.
    pub fn supported_callouts(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    /// Whether any registered carrier implements `S`.
    pub fn has_registered<S: CalloutSpecification>(&self) -> bool {
        self.registered
            .get(&TypeId::of::<S>())
            .is_some_and(|indexes| !indexes.is_empty())
    }

    /// Carriers implementing `S`, in registration order.
    pub fn carriers_for<S: CalloutSpecification>(&self) -> Vec<&S::Callouts> {
        let Some(indexes) = self.registered.get(&TypeId::of::<S>()) else {
            return Vec::new();
        };

        indexes
            .iter()
            .filter_map(|&index| S::resolve(self.carriers[index].carrier()))
            .collect()
    }

    /// Invoke `callout` on every carrier implementing `S`, in registration
    /// order, and return the failures.
    ///
    /// A failure does not stop the remaining carriers. An empty result means
    /// either that every call succeeded or that nothing was called.
    pub fn call_sequential<S, E, F>(&self, mut callout: F) -> Vec<E>
    where
        S: CalloutSpecification,
        E: fmt::Display,
        F: FnMut(&S::Callouts) -> Result<(), E>,
    {
        let Some(indexes) = self.registered.get(&TypeId::of::<S>()) else {
            return Vec::new();
        };

        let mut errors = Vec::new();
        for &index in indexes {
            let hook = &self.carriers[index];
            let Some(callouts) = S::resolve(hook.carrier()) else {
                continue;
            };

            if let Err(e) = callout(callouts) {
                tracing::warn!(category = "hooks", hook = %hook.name(), callout = S::NAME, error = %e, "Callout failed");
                errors.push(e);
            }
        }

        errors
    }

    /// Registered carriers, in registration order.
    pub fn carriers(&self) -> &[HookCarrier] {
        &self.carriers
    }

    /// Close and drop every carrier, returning the close failures by hook
    /// name. A failure does not stop the remaining carriers from closing.
    pub fn unregister_all(&mut self) -> Vec<(String, HookError)> {
        self.registered.clear();

        let mut errors = Vec::new();
        for mut hook in self.carriers.drain(..) {
            if let Err(e) = hook.close() {
                tracing::warn!(category = "hooks", hook = %hook.name(), error = %e, "Cannot close hook");
                errors.push((hook.name().to_string(), e));
            }
        }

        errors
    }
}

impl fmt::Debug for HookExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookExecutor")
            .field("descriptors", &self.descriptors)
            .field("carriers", &self.carriers)
            .finish()
    }
}
