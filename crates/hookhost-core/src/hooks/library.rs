//! Hook library handles and typed access to the well-known symbols.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hookhost_sdk::symbols::{
    CLI_FLAGS_SYMBOL, LOAD_SYMBOL, PROTO_SETTINGS_SYMBOL, VERSION_SYMBOL,
};
use hookhost_sdk::{
    CalloutCarrier, CliFlagsFn, ExportedSymbol, HookSettings, LoadFn, ProtoSettingsFn, Shape,
    Symbol, VersionFn,
};

use crate::error::{Error, Result};

/// Symbol resolution over an opened library.
///
/// The lookup does not validate signatures; [`LibraryManager`] checks each
/// symbol's signature tag against the signature it expects.
pub trait SymbolLookup: Send + Sync {
    fn lookup(&self, symbol: &str) -> Result<Symbol>;
}

/// A dynamic library mapped into the process (.so, .dylib, .dll).
pub struct NativeLibrary {
    library: libloading::Library,
}

impl NativeLibrary {
    /// Map the library at `path` into the process.
    pub fn open(path: &Path) -> Result<Self> {
        // SAFETY: Loading runs the library's initialisers. Hook libraries are
        // operator-installed code the host trusts.
        let library = unsafe { libloading::Library::new(path) }.map_err(|e| Error::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self { library })
    }
}

impl SymbolLookup for NativeLibrary {
    fn lookup(&self, symbol: &str) -> Result<Symbol> {
        // SAFETY: Every hook symbol is a `#[repr(C)]` static of type
        // `ExportedSymbol`, so the resolved address points at one. The entry
        // point it references lives in the library, which stays mapped for as
        // long as this handle (and every carrier created from it) exists.
        let exported: ExportedSymbol = unsafe {
            let raw: libloading::Symbol<'_, *const ExportedSymbol> = self
                .library
                .get(symbol.as_bytes())
                .map_err(|e| Error::SymbolNotFound {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                })?;

            let pointer = *raw;
            if pointer.is_null() {
                return Err(Error::SymbolNotFound {
                    symbol: symbol.to_string(),
                    reason: "symbol resolves to a null address".to_string(),
                });
            }
            *pointer
        };

        Ok(Symbol::new(exported))
    }
}

/// A hook compiled into the host binary, exposed through the same symbol
/// contract as a native library.
#[derive(Debug, Clone, Default)]
pub struct StaticLibrary {
    symbols: HashMap<String, Symbol>,
}

impl StaticLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `entry` under `name`.
    pub fn with_symbol<T: Sync + 'static>(mut self, name: &str, entry: &'static T) -> Self {
        self.symbols
            .insert(name.to_string(), Symbol::new(ExportedSymbol::new(entry)));
        self
    }
}

impl SymbolLookup for StaticLibrary {
    fn lookup(&self, symbol: &str) -> Result<Symbol> {
        self.symbols
            .get(symbol)
            .copied()
            .ok_or_else(|| Error::SymbolNotFound {
                symbol: symbol.to_string(),
                reason: "symbol not found in library".to_string(),
            })
    }
}

/// An opened hook library with typed access to its well-known symbols.
///
/// Opening a library does not check that it is a hook for this host; see
/// [`check_library_compatibility`](super::check_library_compatibility).
pub struct LibraryManager {
    path: PathBuf,
    library: Box<dyn SymbolLookup>,
}

impl LibraryManager {
    /// Open the native library at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let library = NativeLibrary::open(path)?;
        Ok(Self::with_lookup(path, Box::new(library)))
    }

    /// Wrap an already opened library.
    pub fn with_lookup(path: impl Into<PathBuf>, library: Box<dyn SymbolLookup>) -> Self {
        Self {
            path: path.into(),
            library,
        }
    }

    /// Call `Version`. Returns the program the hook is dedicated for and the
    /// framework version it was built against.
    ///
    /// `Version` has the same signature in every release, so it is readable
    /// from hooks built against another SDK release and the compatibility
    /// gate can report the mismatch.
    pub fn version(&self) -> Result<(String, String)> {
        let symbol = self.library.lookup(VERSION_SYMBOL)?;
        let version = symbol
            .downcast_any_release::<VersionFn>()
            .ok_or_else(|| Error::SignatureMismatch {
                symbol: VERSION_SYMBOL.to_string(),
            })?;
        let (program, version) = version();
        Ok((program.to_string(), version.to_string()))
    }

    /// Call `ProtoSettings`.
    ///
    /// Returns `None` if the hook does not export the symbol, meaning it needs
    /// no configuration. A returned prototype must be a struct (a JSON object).
    pub fn proto_settings(&self) -> Result<Option<HookSettings>> {
        let Some(symbol) = self.optional_symbol(PROTO_SETTINGS_SYMBOL) else {
            return Ok(None);
        };
        let proto_settings = downcast::<ProtoSettingsFn>(&symbol, PROTO_SETTINGS_SYMBOL)?;

        let prototype = proto_settings();
        match Shape::of(&prototype) {
            Shape::Struct => Ok(Some(prototype)),
            shape => Err(Error::InvalidPrototype {
                symbol: PROTO_SETTINGS_SYMBOL.to_string(),
                shape,
            }),
        }
    }

    /// Call `CLIFlags`.
    ///
    /// Returns `None` if the hook does not export the symbol or returns null.
    /// Any other value must be a struct.
    pub fn cli_flags(&self) -> Result<Option<HookSettings>> {
        let Some(symbol) = self.optional_symbol(CLI_FLAGS_SYMBOL) else {
            return Ok(None);
        };
        let cli_flags = downcast::<CliFlagsFn>(&symbol, CLI_FLAGS_SYMBOL)?;

        let flags = cli_flags();
        match Shape::of(&flags) {
            Shape::Struct => Ok(Some(flags)),
            Shape::Null => Ok(None),
            shape => Err(Error::InvalidPrototype {
                symbol: CLI_FLAGS_SYMBOL.to_string(),
                shape,
            }),
        }
    }

    /// Call `Load` with the configured settings, or `None` if nothing was
    /// configured for the hook.
    pub fn load(&self, settings: Option<HookSettings>) -> Result<Box<dyn CalloutCarrier>> {
        let load = self.typed_symbol::<LoadFn>(LOAD_SYMBOL)?;
        load(settings).map_err(Error::Activation)
    }

    /// Path the library was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hook name: the file name without directory and extension.
    pub fn name(&self) -> String {
        hook_name(&self.path)
    }

    fn typed_symbol<T: 'static>(&self, name: &str) -> Result<&'static T> {
        let symbol = self.library.lookup(name)?;
        downcast::<T>(&symbol, name)
    }

    fn optional_symbol(&self, name: &str) -> Option<Symbol> {
        match self.library.lookup(name) {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                tracing::trace!(category = "hooks", path = %self.path.display(), error = %e, "Optional symbol missing");
                None
            }
        }
    }
}

impl std::fmt::Debug for LibraryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryManager")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn downcast<T: 'static>(symbol: &Symbol, name: &str) -> Result<&'static T> {
    symbol.downcast::<T>().ok_or_else(|| {
        tracing::debug!(
            category = "hooks",
            symbol = name,
            signature = symbol.signature(),
            sdk_version = symbol.sdk_version(),
            expected = std::any::type_name::<T>(),
            "Symbol signature rejected"
        );
        Error::SignatureMismatch {
            symbol: name.to_string(),
        }
    })
}

/// Derive a hook name from its path: strip the directory components and the
/// extension.
pub fn hook_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
