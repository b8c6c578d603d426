//! Hook-side error types.

use thiserror::Error;

use crate::settings::SettingsError;

/// Error returned by a hook: from `Load`, from a callout, or from `close`.
#[derive(Debug, Error)]
pub enum HookError {
    /// The settings handed to the hook could not be decoded.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// Any other failure reported by the hook.
    #[error("{0}")]
    Failed(String),
}

impl HookError {
    /// Shorthand for [`HookError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        HookError::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HookError::failed("connection refused");
        assert_eq!(err.to_string(), "connection refused");

        let err = HookError::from(SettingsError::Missing);
        assert_eq!(err.to_string(), "invalid settings: settings are required");
    }
}
