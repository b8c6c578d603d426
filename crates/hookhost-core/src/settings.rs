//! Settings resolution.
//!
//! Turns the prototypes collected from the hooks and the values configured by
//! the operator into the settings handed to each hook's `Load`.

use std::collections::HashMap;

use hookhost_sdk::{HookSettings, Shape};
use serde_json::{Map, Value};

use crate::config::env_vars;
use crate::error::{Error, Result};

/// Merge the configured settings into the hook prototypes.
///
/// Every hook with a prototype receives it, overlaid with its configured
/// values. A configured key must exist in the prototype and hold the same
/// kind of value; a null prototype field accepts anything. Settings for a
/// hook that is not in the directory, or that takes no settings, are
/// rejected. Hooks without prototype and without configuration are absent
/// from the result and receive no settings.
pub fn resolve_settings(
    prototypes: &HashMap<String, Option<HookSettings>>,
    configured: &HashMap<String, HookSettings>,
) -> Result<HashMap<String, HookSettings>> {
    for hook in configured.keys() {
        match prototypes.get(hook) {
            None => {
                return Err(Error::Settings {
                    hook: hook.clone(),
                    reason: "no such hook in the hook directory".to_string(),
                })
            }
            Some(None) => {
                return Err(Error::Settings {
                    hook: hook.clone(),
                    reason: "the hook takes no settings".to_string(),
                })
            }
            Some(Some(_)) => {}
        }
    }

    let mut resolved = HashMap::new();
    for (hook, prototype) in prototypes {
        let Some(prototype) = prototype else {
            continue;
        };

        let settings = match configured.get(hook) {
            Some(values) => merge(hook, prototype, values).map_err(|reason| Error::Settings {
                hook: hook.clone(),
                reason,
            })?,
            None => prototype.clone(),
        };
        resolved.insert(hook.clone(), settings);
    }

    Ok(resolved)
}

fn merge(path: &str, prototype: &Value, value: &Value) -> std::result::Result<Value, String> {
    match (prototype, value) {
        (Value::Null, value) => Ok(value.clone()),
        (Value::Object(fields), Value::Object(values)) => {
            let mut merged = fields.clone();
            for (key, value) in values {
                let field_path = format!("{}.{}", path, key);
                let Some(field) = fields.get(key) else {
                    return Err(format!("unknown setting {}", field_path));
                };
                merged.insert(key.clone(), merge(&field_path, field, value)?);
            }
            Ok(Value::Object(merged))
        }
        (prototype, value) => {
            let expected = Shape::of(prototype);
            let actual = Shape::of(value);
            if expected != actual {
                return Err(format!("setting {} must be {}, got {}", path, expected, actual));
            }
            Ok(value.clone())
        }
    }
}

/// Settings overrides from the environment.
///
/// For every top-level field of every prototype, reads
/// `HOOKHOST_<PROGRAM>_HOOK_<HOOK>_<KEY>`, upper-cased with non-alphanumeric
/// characters replaced by `_`, and converts the value to the kind of the
/// prototype field. The result holds only the fields that were set.
pub fn env_overrides(
    program: &str,
    prototypes: &HashMap<String, Option<HookSettings>>,
) -> Result<HashMap<String, HookSettings>> {
    env_overrides_from(program, prototypes, |name| std::env::var(name).ok())
}

/// [`env_overrides`] over an arbitrary variable source.
pub fn env_overrides_from<F>(
    program: &str,
    prototypes: &HashMap<String, Option<HookSettings>>,
    mut lookup: F,
) -> Result<HashMap<String, HookSettings>>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut overrides = HashMap::new();

    for (hook, prototype) in prototypes {
        let Some(Value::Object(fields)) = prototype else {
            continue;
        };

        let mut values = Map::new();
        for (key, field) in fields {
            let name = override_variable(program, hook, key);
            let Some(raw) = lookup(&name) else {
                continue;
            };

            let value = parse_override(field, &raw).map_err(|reason| Error::Settings {
                hook: hook.clone(),
                reason: format!("{}: {}", name, reason),
            })?;
            tracing::debug!(category = "hooks", hook = %hook, variable = %name, "Settings override from environment");
            values.insert(key.clone(), value);
        }

        if !values.is_empty() {
            overrides.insert(hook.clone(), Value::Object(values));
        }
    }

    Ok(overrides)
}

/// Overlay `overrides` on `configured`, field by field.
pub fn apply_overrides(
    configured: &mut HashMap<String, HookSettings>,
    overrides: HashMap<String, HookSettings>,
) {
    for (hook, values) in overrides {
        let entry = configured
            .entry(hook)
            .or_insert_with(|| Value::Object(Map::new()));
        match (entry, values) {
            (Value::Object(existing), Value::Object(values)) => existing.extend(values),
            (entry, values) => *entry = values,
        }
    }
}

/// Environment variable overriding `key` of `hook`.
pub fn override_variable(program: &str, hook: &str, key: &str) -> String {
    let program = program.strip_prefix("hookhost-").unwrap_or(program);
    format!(
        "{}_{}_HOOK_{}_{}",
        env_vars::PREFIX,
        variable_segment(program),
        variable_segment(hook),
        variable_segment(key)
    )
}

fn variable_segment(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn parse_override(field: &Value, raw: &str) -> std::result::Result<Value, String> {
    match Shape::of(field) {
        Shape::String => Ok(Value::String(raw.to_string())),
        Shape::Bool => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| format!("expected a bool, got {:?}", raw)),
        Shape::Number => {
            if let Ok(number) = raw.parse::<i64>() {
                return Ok(Value::from(number));
            }
            raw.parse::<f64>()
                .ok()
                .and_then(|number| serde_json::Number::from_f64(number).map(Value::Number))
                .ok_or_else(|| format!("expected a number, got {:?}", raw))
        }
        Shape::Null => Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))),
        shape @ (Shape::Array | Shape::Struct) => {
            let value: Value = serde_json::from_str(raw).map_err(|e| format!("expected JSON {}: {}", shape, e))?;
            if Shape::of(&value) != shape {
                return Err(format!("expected JSON {}, got {}", shape, Shape::of(&value)));
            }
            Ok(value)
        }
    }
}
