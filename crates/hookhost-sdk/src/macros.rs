//! Declarative macros for hook development.

/// Export the well-known hook symbols.
///
/// `Version` is generated from the given program identifier and the SDK
/// [`VERSION`](crate::VERSION). `Load` is mandatory; `ProtoSettings` and
/// `CLIFlags` are exported only when given.
///
/// # Example
///
/// ```rust,ignore
/// use hookhost_sdk::prelude::*;
///
/// export_hook! {
///     program: PROGRAM_AGENT,
///     load: load,
///     proto_settings: proto_settings,
///     cli_flags: cli_flags,
/// }
/// ```
#[macro_export]
macro_rules! export_hook {
    (
        program: $program:expr,
        load: $load:path
        $(, proto_settings: $proto:path)?
        $(, cli_flags: $flags:path)?
        $(,)?
    ) => {
        fn __hookhost_version() -> (&'static str, &'static str) {
            ($program, $crate::VERSION)
        }

        static __HOOKHOST_VERSION: $crate::symbols::VersionFn = __hookhost_version;
        static __HOOKHOST_LOAD: $crate::symbols::LoadFn = $load;

        #[allow(non_upper_case_globals)]
        #[no_mangle]
        pub static Version: $crate::symbols::ExportedSymbol =
            $crate::symbols::ExportedSymbol::new(&__HOOKHOST_VERSION);

        #[allow(non_upper_case_globals)]
        #[no_mangle]
        pub static Load: $crate::symbols::ExportedSymbol =
            $crate::symbols::ExportedSymbol::new(&__HOOKHOST_LOAD);

        $(
            static __HOOKHOST_PROTO_SETTINGS: $crate::symbols::ProtoSettingsFn = $proto;

            #[allow(non_upper_case_globals)]
            #[no_mangle]
            pub static ProtoSettings: $crate::symbols::ExportedSymbol =
                $crate::symbols::ExportedSymbol::new(&__HOOKHOST_PROTO_SETTINGS);
        )?

        $(
            static __HOOKHOST_CLI_FLAGS: $crate::symbols::CliFlagsFn = $flags;

            #[allow(non_upper_case_globals)]
            #[no_mangle]
            pub static CLIFlags: $crate::symbols::ExportedSymbol =
                $crate::symbols::ExportedSymbol::new(&__HOOKHOST_CLI_FLAGS);
        )?
    };
}
