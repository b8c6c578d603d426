//! Activated hooks.

use std::path::Path;

use hookhost_sdk::{CalloutCarrier, HookError};

use super::library::LibraryManager;

/// A carrier together with the library it was loaded from.
///
/// The carrier's code lives in the library, so the library must outlive it.
/// Fields drop in declaration order: the carrier goes first.
pub struct HookCarrier {
    name: String,
    carrier: Box<dyn CalloutCarrier>,
    library: Option<LibraryManager>,
}

impl HookCarrier {
    /// A carrier that is not backed by a loaded library, e.g. one compiled
    /// into the host.
    pub fn new(name: impl Into<String>, carrier: Box<dyn CalloutCarrier>) -> Self {
        Self {
            name: name.into(),
            carrier,
            library: None,
        }
    }

    /// A carrier returned by the `Load` of `library`.
    pub fn from_library(library: LibraryManager, carrier: Box<dyn CalloutCarrier>) -> Self {
        Self {
            name: library.name(),
            carrier,
            library: Some(library),
        }
    }

    /// Hook name; the library file name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Library path, if the carrier was loaded from one.
    pub fn path(&self) -> Option<&Path> {
        self.library.as_ref().map(LibraryManager::path)
    }

    pub fn carrier(&self) -> &dyn CalloutCarrier {
        self.carrier.as_ref()
    }

    pub(crate) fn close(&mut self) -> Result<(), HookError> {
        self.carrier.close()
    }
}

impl std::fmt::Debug for HookCarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookCarrier")
            .field("name", &self.name)
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}
