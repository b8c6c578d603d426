//! Error taxonomy of the hook framework.
//!
//! Discovery and activation errors are fatal to the whole hook subsystem;
//! callout and teardown failures are collected and reported together through
//! [`Error::Combined`].

use std::fmt;
use std::path::PathBuf;

use hookhost_sdk::{HookError, Shape};
use thiserror::Error;

/// Result type for hook framework operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The hook directory could not be listed.
    #[error("cannot find hook library paths in: {}: {source}", .directory.display())]
    Directory {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is missing or is not a loadable library for this platform.
    #[error("cannot open hook library: {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("lookup for symbol: {symbol} failed: {reason}")]
    SymbolNotFound { symbol: String, reason: String },

    #[error("symbol {symbol} has unexpected signature")]
    SignatureMismatch { symbol: String },

    /// The hook was built for another host program.
    #[error("hook library dedicated for another program: {program}")]
    ProgramMismatch { program: String },

    /// The hook was built against another framework release.
    #[error("incompatible hook version: {version} (expected {expected})")]
    VersionMismatch { version: String, expected: String },

    /// A prototype is valid when it is a JSON object.
    #[error("returned prototype of the hook settings must be a pointer to struct, got {shape} from {symbol}")]
    InvalidPrototype { symbol: String, shape: Shape },

    /// Two libraries of the directory map to the same hook name.
    #[error("duplicate hook {name}: {}", DisplayPaths(.paths))]
    DuplicateHook { name: String, paths: Vec<PathBuf> },

    /// The hook's `Load` returned an error.
    #[error("cannot load the hook: {0}")]
    Activation(#[source] HookError),

    /// Any of the above, attributed to the library it came from.
    #[error("hook library {}: {source}", .path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Several independent failures, e.g. from one callout round.
    #[error("{}", Combined(.context, .messages))]
    Combined {
        context: String,
        messages: Vec<String>,
    },

    #[error("invalid settings for hook {hook}: {reason}")]
    Settings { hook: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

struct Combined<'a>(&'a str, &'a [String]);

impl fmt::Display for Combined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1.join("; "))
    }
}

struct DisplayPaths<'a>(&'a [PathBuf]);

impl fmt::Display for DisplayPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

impl Error {
    /// Attribute the error to a hook library.
    pub fn in_library(self, path: impl Into<PathBuf>) -> Self {
        Error::Library {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error means the hook does not fit this host (wrong program
    /// or version), looking through library attribution.
    pub fn is_incompatibility(&self) -> bool {
        match self {
            Error::ProgramMismatch { .. } | Error::VersionMismatch { .. } => true,
            Error::Library { source, .. } => source.is_incompatibility(),
            _ => false,
        }
    }
}

/// Combine the errors collected from one round of calls.
///
/// Returns `Ok(())` for an empty list; otherwise a single error that keeps
/// every individual message, prefixed with `context`.
pub fn combine_errors<E: fmt::Display>(context: &str, errors: Vec<E>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    Err(Error::Combined {
        context: context.to_string(),
        messages: errors.iter().map(ToString::to_string).collect(),
    })
}
