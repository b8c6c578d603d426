//! In-memory hooks and lookups shared by the unit tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hookhost_sdk::prelude::*;
use hookhost_sdk::{LoadFn, ProtoSettingsFn, VersionFn};
use serde_json::json;

use super::carrier::HookCarrier;
use super::library::{LibraryManager, StaticLibrary};
use super::walker::HookLookup;
use crate::error::{Error, Result};

pub(crate) const PROGRAM: &str = PROGRAM_AGENT;

/// Carrier that remembers the settings it was loaded with.
pub(crate) struct SettingsCarrier {
    pub settings: Option<HookSettings>,
}

impl CalloutCarrier for SettingsCarrier {
    fn close(&mut self) -> std::result::Result<(), HookError> {
        Ok(())
    }
}

fn agent_version() -> (&'static str, &'static str) {
    (PROGRAM_AGENT, VERSION)
}

fn server_version() -> (&'static str, &'static str) {
    (PROGRAM_SERVER, VERSION)
}

fn outdated_version() -> (&'static str, &'static str) {
    (PROGRAM_AGENT, "0.0.1-outdated")
}

fn load(settings: Option<HookSettings>) -> std::result::Result<Box<dyn CalloutCarrier>, HookError> {
    Ok(Box::new(SettingsCarrier { settings }))
}

/// Number of closed carriers loaded by [`closing_hook`].
pub(crate) static CLOSING_HOOK_CLOSES: AtomicUsize = AtomicUsize::new(0);

struct ClosingCarrier;

impl CalloutCarrier for ClosingCarrier {
    fn close(&mut self) -> std::result::Result<(), HookError> {
        CLOSING_HOOK_CLOSES.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn closing_load(_: Option<HookSettings>) -> std::result::Result<Box<dyn CalloutCarrier>, HookError> {
    Ok(Box::new(ClosingCarrier))
}

fn failing_load(_: Option<HookSettings>) -> std::result::Result<Box<dyn CalloutCarrier>, HookError> {
    Err(HookError::failed("load failed"))
}

pub(crate) fn struct_prototype() -> HookSettings {
    json!({ "endpoint": "", "retries": 0 })
}

fn integer_prototype() -> HookSettings {
    json!(0)
}

static AGENT_VERSION: VersionFn = agent_version;
static SERVER_VERSION: VersionFn = server_version;
static OUTDATED_VERSION: VersionFn = outdated_version;
static LOAD: LoadFn = load;
static FAILING_LOAD: LoadFn = failing_load;
static CLOSING_LOAD: LoadFn = closing_load;
static STRUCT_PROTOTYPE: ProtoSettingsFn = struct_prototype;
static INTEGER_PROTOTYPE: ProtoSettingsFn = integer_prototype;

pub(crate) fn compatible_hook() -> StaticLibrary {
    StaticLibrary::new()
        .with_symbol("Version", &AGENT_VERSION)
        .with_symbol("Load", &LOAD)
}

pub(crate) fn hook_with_prototype() -> StaticLibrary {
    compatible_hook()
        .with_symbol("ProtoSettings", &STRUCT_PROTOTYPE)
        .with_symbol("CLIFlags", &STRUCT_PROTOTYPE)
}

pub(crate) fn hook_with_invalid_prototype() -> StaticLibrary {
    compatible_hook()
        .with_symbol("ProtoSettings", &INTEGER_PROTOTYPE)
        .with_symbol("CLIFlags", &INTEGER_PROTOTYPE)
}

pub(crate) fn server_hook() -> StaticLibrary {
    StaticLibrary::new()
        .with_symbol("Version", &SERVER_VERSION)
        .with_symbol("Load", &LOAD)
}

pub(crate) fn outdated_hook() -> StaticLibrary {
    StaticLibrary::new()
        .with_symbol("Version", &OUTDATED_VERSION)
        .with_symbol("Load", &LOAD)
}

pub(crate) fn failing_hook() -> StaticLibrary {
    StaticLibrary::new()
        .with_symbol("Version", &AGENT_VERSION)
        .with_symbol("Load", &FAILING_LOAD)
}

/// A hook whose carrier counts its closes in [`CLOSING_HOOK_CLOSES`].
pub(crate) fn closing_hook() -> StaticLibrary {
    StaticLibrary::new()
        .with_symbol("Version", &AGENT_VERSION)
        .with_symbol("Load", &CLOSING_LOAD)
}

/// Directory listing served from memory. Entries are listed in insertion
/// order, which lets the tests check that the walker sorts them.
#[derive(Default)]
pub(crate) struct MockLookup {
    entries: Vec<(PathBuf, Option<StaticLibrary>)>,
    list_fails: bool,
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockLookup {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_hook(mut self, path: &str, library: StaticLibrary) -> Self {
        self.entries.push((PathBuf::from(path), Some(library)));
        self
    }

    /// A file that cannot be opened as a library.
    pub(crate) fn with_broken(mut self, path: &str) -> Self {
        self.entries.push((PathBuf::from(path), None));
        self
    }

    pub(crate) fn failing() -> Self {
        Self {
            list_fails: true,
            ..Self::default()
        }
    }

    /// Paths the walker opened, in order.
    pub(crate) fn opened(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.opened)
    }
}

impl HookLookup for MockLookup {
    fn list_file_paths(&self, directory: &Path) -> std::io::Result<Vec<PathBuf>> {
        if self.list_fails {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", directory.display()),
            ));
        }
        Ok(self.entries.iter().map(|(path, _)| directory.join(path)).collect())
    }

    fn open_library(&self, path: &Path) -> Result<LibraryManager> {
        self.opened.lock().unwrap().push(path.to_path_buf());

        let library = self
            .entries
            .iter()
            .find(|(entry, _)| path.ends_with(entry))
            .and_then(|(_, library)| library.clone());

        match library {
            Some(library) => Ok(LibraryManager::with_lookup(path, Box::new(library))),
            None => Err(Error::Open {
                path: path.to_path_buf(),
                reason: "invalid ELF header".to_string(),
            }),
        }
    }
}

/// Carrier implementing both callout interfaces, recording every call into a
/// shared journal.
pub(crate) struct RecordingCarrier {
    pub name: &'static str,
    pub fail: bool,
    pub fail_close: bool,
    pub journal: Arc<Mutex<Vec<String>>>,
}

impl RecordingCarrier {
    pub(crate) fn new(name: &'static str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            fail: false,
            fail_close: false,
            journal: Arc::clone(journal),
        }
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub(crate) fn into_hook(self) -> HookCarrier {
        HookCarrier::new(self.name, Box::new(self))
    }

    fn record(&self, event: &str) -> std::result::Result<(), HookError> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, event));
        if self.fail {
            return Err(HookError::failed(format!("{} refused", self.name)));
        }
        Ok(())
    }
}

impl CalloutCarrier for RecordingCarrier {
    fn close(&mut self) -> std::result::Result<(), HookError> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:close", self.name));
        if self.fail_close {
            return Err(HookError::failed(format!("{} cannot close", self.name)));
        }
        Ok(())
    }

    fn as_before_forward_to_server(
        &self,
    ) -> Option<&(dyn BeforeForwardToServerCallouts + 'static)> {
        Some(self)
    }

    fn as_before_forward_to_agent(&self) -> Option<&(dyn BeforeForwardToAgentCallouts + 'static)> {
        Some(self)
    }
}

impl BeforeForwardToServerCallouts for RecordingCarrier {
    fn on_before_forward_to_server(
        &self,
        request: &ForwardToServerRequest,
    ) -> std::result::Result<(), HookError> {
        self.record(&request.url)
    }
}

impl BeforeForwardToAgentCallouts for RecordingCarrier {
    fn on_before_forward_to_agent(
        &self,
        request: &ForwardToAgentRequest,
    ) -> std::result::Result<(), HookError> {
        self.record(&request.agent_address)
    }
}

/// Carrier implementing no callout interface.
pub(crate) struct SilentCarrier;

impl CalloutCarrier for SilentCarrier {
    fn close(&mut self) -> std::result::Result<(), HookError> {
        Ok(())
    }
}
