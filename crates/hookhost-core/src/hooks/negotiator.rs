//! Settings schema discovery.
//!
//! Before any hook is loaded, the host asks every compatible hook for the
//! shape of its settings. The prototypes drive configuration parsing; see
//! [`crate::settings::resolve_settings`].

use std::collections::HashMap;
use std::path::Path;

use hookhost_sdk::HookSettings;

use super::library::LibraryManager;
use super::walker::HookWalker;
use crate::error::{Error, Result};

impl HookWalker {
    /// Collect the `ProtoSettings` prototype of every compatible hook in
    /// `directory`, keyed by hook name.
    ///
    /// A hook without the symbol maps to `None`. A malformed prototype aborts
    /// the whole collection.
    pub fn collect_proto_settings(
        &self,
        program: &str,
        directory: &Path,
    ) -> Result<HashMap<String, Option<HookSettings>>> {
        self.collect(program, directory, LibraryManager::proto_settings)
    }

    /// Collect the `CLIFlags` prototype of every compatible hook in
    /// `directory`, keyed by hook name. Same rules as
    /// [`collect_proto_settings`](Self::collect_proto_settings).
    pub fn collect_cli_flags(
        &self,
        program: &str,
        directory: &Path,
    ) -> Result<HashMap<String, Option<HookSettings>>> {
        self.collect(program, directory, LibraryManager::cli_flags)
    }

    fn collect(
        &self,
        program: &str,
        directory: &Path,
        extract: fn(&LibraryManager) -> Result<Option<HookSettings>>,
    ) -> Result<HashMap<String, Option<HookSettings>>> {
        let mut all_settings = HashMap::new();
        let mut library_error: Option<Error> = None;

        self.walk_compatible_plugin_libraries(program, directory, |path, library| {
            match extract(&library) {
                Ok(prototype) => {
                    all_settings.insert(library.name(), prototype);
                    true
                }
                Err(e) => {
                    library_error = Some(e.in_library(path));
                    false
                }
            }
        })?;

        match library_error {
            Some(e) => Err(e),
            None => Ok(all_settings),
        }
    }
}
