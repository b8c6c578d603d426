//! Settings payload that crosses the host/hook boundary.
//!
//! The host never interprets a concrete settings value. It asks each hook for
//! a zero-valued prototype, fills the prototype from configuration and hands
//! the result back to `Load`, where the hook decodes it into its own type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Opaque settings value threaded from configuration into a hook.
pub type HookSettings = Value;

/// Failure to decode a settings payload into the hook's own type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are required")]
    Missing,

    #[error("cannot decode settings: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Structural kind of a settings payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A record with named fields; the only valid prototype shape.
    Struct,
    Null,
    Bool,
    Number,
    String,
    Array,
}

impl Shape {
    /// Classify a payload.
    pub fn of(value: &HookSettings) -> Self {
        match value {
            Value::Object(_) => Shape::Struct,
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Bool,
            Value::Number(_) => Shape::Number,
            Value::String(_) => Shape::String,
            Value::Array(_) => Shape::Array,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Struct => "struct",
            Shape::Null => "null",
            Shape::Bool => "bool",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Array => "array",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the zero-valued prototype of a settings type.
///
/// Returns [`Value::Null`] if the type cannot be represented, which the host
/// rejects as an invalid prototype.
pub fn prototype<T: Default + Serialize>() -> HookSettings {
    serde_json::to_value(T::default()).unwrap_or(Value::Null)
}

/// Decode the settings handed to `Load`.
///
/// `None` (and an explicit null) means the host had nothing configured for the
/// hook.
pub fn decode<T: DeserializeOwned>(
    settings: Option<HookSettings>,
) -> Result<Option<T>, SettingsError> {
    match settings {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Decode settings that the hook cannot run without.
pub fn decode_required<T: DeserializeOwned>(
    settings: Option<HookSettings>,
) -> Result<T, SettingsError> {
    decode(settings)?.ok_or(SettingsError::Missing)
}
