//! Well-known symbols exported by a hook library.
//!
//! Every symbol is a `#[no_mangle]` static of type [`ExportedSymbol`]: the
//! address of the typed entry point, tagged with the name of its type and the
//! SDK release it was compiled against. The host compares the tag with the
//! signature it expects before casting the address back, so a symbol with the
//! right name but the wrong shape is detected instead of being called.
//!
//! Type names stay the same when the SDK is compiled again in another build,
//! unlike `TypeId`s, which is what lets independently built hooks load.

use std::any::type_name;

use crate::carrier::CalloutCarrier;
use crate::error::HookError;
use crate::settings::HookSettings;

/// Name of the mandatory version symbol.
pub const VERSION_SYMBOL: &str = "Version";

/// Name of the optional settings prototype symbol.
pub const PROTO_SETTINGS_SYMBOL: &str = "ProtoSettings";

/// Name of the optional CLI flags prototype symbol.
pub const CLI_FLAGS_SYMBOL: &str = "CLIFlags";

/// Name of the mandatory activation symbol.
pub const LOAD_SYMBOL: &str = "Load";

/// Returns the program the hook targets and the framework version it was
/// built against.
pub type VersionFn = fn() -> (&'static str, &'static str);

/// Returns the zero-valued settings prototype.
pub type ProtoSettingsFn = fn() -> HookSettings;

/// Returns the settings prototype used for flag registration, or null.
pub type CliFlagsFn = fn() -> HookSettings;

/// Activates the hook with the configured settings.
pub type LoadFn = fn(Option<HookSettings>) -> Result<Box<dyn CalloutCarrier>, HookError>;

/// Layout of every exported symbol static.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ExportedSymbol {
    /// `type_name` of the entry point, monomorphized in the exporting crate.
    signature: fn() -> &'static str,
    /// SDK release the exporting crate was compiled against.
    sdk_version: &'static str,
    entry: *const (),
}

// SAFETY: `entry` is only ever created from a `&'static T` with `T: Sync`, and
// the pointee is never written through.
unsafe impl Send for ExportedSymbol {}
unsafe impl Sync for ExportedSymbol {}

impl ExportedSymbol {
    /// Export `entry` under its own type.
    pub const fn new<T: Sync + 'static>(entry: &'static T) -> Self {
        Self {
            signature: type_name::<T> as fn() -> &'static str,
            sdk_version: crate::VERSION,
            entry: entry as *const T as *const (),
        }
    }
}

/// A symbol resolved from a hook library.
#[derive(Clone, Copy)]
pub struct Symbol(ExportedSymbol);

impl Symbol {
    pub fn new(exported: ExportedSymbol) -> Self {
        Self(exported)
    }

    /// Recover the typed entry point. Returns `None` when the symbol has a
    /// different signature than `T` or comes from another SDK release.
    pub fn downcast<T: 'static>(&self) -> Option<&'static T> {
        if self.sdk_version() != crate::VERSION {
            return None;
        }
        self.downcast_any_release()
    }

    /// [`Symbol::downcast`] without the SDK release check. Only sound for
    /// signatures that are identical in every release, such as [`VersionFn`].
    pub fn downcast_any_release<T: 'static>(&self) -> Option<&'static T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: The signature tag names `T`, so `entry` was created from a
        // `&'static T` of the same type definition.
        Some(unsafe { &*(self.0.entry as *const T) })
    }

    /// Whether the symbol has the signature `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.signature() == type_name::<T>()
    }

    /// Name of the exported entry point type.
    pub fn signature(&self) -> &'static str {
        (self.0.signature)()
    }

    /// SDK release the exporting library was compiled against.
    pub fn sdk_version(&self) -> &'static str {
        self.0.sdk_version
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Symbol")
            .field("signature", &self.signature())
            .field("sdk_version", &self.sdk_version())
            .finish()
    }
}
