//! Compatibility gate between the host and a hook library.

use hookhost_sdk::VERSION;

use super::library::LibraryManager;
use crate::error::{Error, Result};

/// Verify that the library reports exactly `expected_program` and the
/// framework [`VERSION`] of this host.
///
/// The program is checked first; no range or semantic version matching is
/// performed.
pub fn check_library_compatibility(library: &LibraryManager, expected_program: &str) -> Result<()> {
    let (program, version) = library.version()?;

    if program != expected_program {
        return Err(Error::ProgramMismatch { program });
    }

    if version != VERSION {
        return Err(Error::VersionMismatch {
            version,
            expected: VERSION.to_string(),
        });
    }

    Ok(())
}
