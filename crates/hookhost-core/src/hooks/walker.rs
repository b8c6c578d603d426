//! Hook directory discovery, compatibility filtering and activation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use hookhost_sdk::HookSettings;
use serde::Serialize;

use super::carrier::HookCarrier;
use super::compat::check_library_compatibility;
use super::library::LibraryManager;
use crate::error::{Error, Result};

/// Filesystem access of the walker.
pub trait HookLookup: Send + Sync {
    /// Every entry of `directory`, as full paths.
    fn list_file_paths(&self, directory: &Path) -> std::io::Result<Vec<PathBuf>>;

    fn open_library(&self, path: &Path) -> Result<LibraryManager>;
}

/// Lists the real directory and opens native libraries.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

impl HookLookup for SystemLookup {
    fn list_file_paths(&self, directory: &Path) -> std::io::Result<Vec<PathBuf>> {
        fs::read_dir(directory)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect()
    }

    fn open_library(&self, path: &Path) -> Result<LibraryManager> {
        LibraryManager::open(path)
    }
}

/// Outcome of inspecting one directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum InspectionStatus {
    Compatible,
    Incompatible(String),
    Unloadable(String),
}

/// Report on one directory entry, see [`HookWalker::inspect`].
#[derive(Debug, Clone, Serialize)]
pub struct HookInspection {
    pub path: PathBuf,
    pub name: String,
    /// Program and version the hook reports, if it could be asked.
    pub program: Option<String>,
    pub version: Option<String>,
    pub status: InspectionStatus,
}

/// Walks a hook directory in file name order.
pub struct HookWalker {
    lookup: Box<dyn HookLookup>,
}

impl Default for HookWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl HookWalker {
    pub fn new() -> Self {
        Self::with_lookup(Box::new(SystemLookup))
    }

    pub fn with_lookup(lookup: Box<dyn HookLookup>) -> Self {
        Self { lookup }
    }

    /// Visit every entry of `directory`, sorted by file name.
    ///
    /// The visitor receives the opened library or the open error and returns
    /// whether to continue. An opened library is not necessarily a hook for
    /// this host. Only a failure to list the directory is an error of the walk
    /// itself.
    pub fn walk_plugin_libraries<F>(&self, directory: &Path, mut visit: F) -> Result<()>
    where
        F: FnMut(&Path, Result<LibraryManager>) -> bool,
    {
        let mut paths = self
            .lookup
            .list_file_paths(directory)
            .map_err(|source| Error::Directory {
                directory: directory.to_path_buf(),
                source,
            })?;
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        for path in paths {
            tracing::debug!(category = "hooks", path = %path.display(), "Visiting hook library");
            let library = self.lookup.open_library(&path);
            if !visit(&path, library) {
                break;
            }
        }

        Ok(())
    }

    /// Visit the libraries of `directory` that are hooks for `program` at this
    /// framework version.
    ///
    /// Fails closed: the first entry that cannot be opened, is not
    /// compatible, or has the same hook name as an earlier entry (`foo.so`
    /// next to `foo.dylib`) aborts the walk with its error, and no further
    /// entries are visited.
    pub fn walk_compatible_plugin_libraries<F>(
        &self,
        program: &str,
        directory: &Path,
        mut visit: F,
    ) -> Result<()>
    where
        F: FnMut(&Path, LibraryManager) -> bool,
    {
        let mut library_error = None;
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        self.walk_plugin_libraries(directory, |path, library| {
            let library = match library {
                Ok(library) => library,
                Err(e) => {
                    library_error = Some(e);
                    return false;
                }
            };

            if let Err(e) = check_library_compatibility(&library, program) {
                tracing::warn!(category = "hooks", path = %path.display(), error = %e, "Incompatible hook library");
                library_error = Some(e.in_library(path));
                return false;
            }

            let name = library.name();
            if let Some(first) = seen.insert(name.clone(), path.to_path_buf()) {
                library_error = Some(Error::DuplicateHook {
                    name,
                    paths: vec![first, path.to_path_buf()],
                });
                return false;
            }

            visit(path, library)
        })?;

        match library_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Load every compatible hook of `directory`, in file name order.
    ///
    /// Each hook's `Load` receives the settings configured under its name, or
    /// `None`. Any failure aborts the activation: carriers loaded before the
    /// failure are closed, and the failure is returned.
    pub fn load_all_hooks(
        &self,
        program: &str,
        directory: &Path,
        all_settings: &HashMap<String, HookSettings>,
    ) -> Result<Vec<HookCarrier>> {
        let mut carriers = Vec::new();
        let mut library_error = None;

        let walked = self
            .walk_compatible_plugin_libraries(program, directory, |path, library| {
                let name = library.name();
                let settings = all_settings.get(&name).cloned();

                match library.load(settings) {
                    Ok(carrier) => {
                        tracing::debug!(category = "hooks", hook = %name, path = %path.display(), "Hook loaded");
                        carriers.push(HookCarrier::from_library(library, carrier));
                        true
                    }
                    Err(e) => {
                        library_error = Some(e.in_library(path));
                        false
                    }
                }
            })
            .and_then(|()| library_error.map_or(Ok(()), Err));

        match walked {
            Ok(()) => Ok(carriers),
            Err(e) => {
                close_activated(carriers);
                Err(e)
            }
        }
    }

    /// Report on every entry of `directory` without aborting on failures.
    pub fn inspect(&self, program: &str, directory: &Path) -> Result<Vec<HookInspection>> {
        let mut inspections = Vec::new();

        self.walk_plugin_libraries(directory, |path, library| {
            let mut inspection = HookInspection {
                path: path.to_path_buf(),
                name: super::library::hook_name(path),
                program: None,
                version: None,
                status: InspectionStatus::Compatible,
            };

            match library {
                Err(e) => inspection.status = InspectionStatus::Unloadable(e.to_string()),
                Ok(library) => {
                    if let Ok((hook_program, hook_version)) = library.version() {
                        inspection.program = Some(hook_program);
                        inspection.version = Some(hook_version);
                    }
                    if let Err(e) = check_library_compatibility(&library, program) {
                        inspection.status = if e.is_incompatibility() {
                            InspectionStatus::Incompatible(e.to_string())
                        } else {
                            InspectionStatus::Unloadable(e.to_string())
                        };
                    }
                }
            }

            inspections.push(inspection);
            true
        })?;

        Ok(inspections)
    }
}

/// Close the carriers of an aborted activation, newest first. Close failures
/// are only logged; the activation error is what the caller sees.
fn close_activated(carriers: Vec<HookCarrier>) {
    for mut hook in carriers.into_iter().rev() {
        if let Err(e) = hook.close() {
            tracing::warn!(category = "hooks", hook = %hook.name(), error = %e, "Cannot close hook after failed activation");
        }
    }
}
