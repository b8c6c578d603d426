//! Hook configuration.
//!
//! Defaults and environment variable names of the hook subsystem, plus the
//! `[hooks]` section of a host's TOML configuration file:
//!
//! ```toml
//! [hooks]
//! directory = "/usr/lib/hookhost/hooks-agent"
//!
//! [hooks.settings.audit]
//! endpoint = "http://audit.local:8080"
//! retries = 3
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hookhost_sdk::{HookSettings, PROGRAM_AGENT, PROGRAM_SERVER};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default hook directories.
pub mod defaults {
    pub const AGENT_HOOK_DIRECTORY: &str = "/usr/lib/hookhost/hooks-agent";
    pub const SERVER_HOOK_DIRECTORY: &str = "/usr/lib/hookhost/hooks-server";
}

/// Environment variable names.
pub mod env_vars {
    pub const AGENT_HOOK_DIRECTORY: &str = "HOOKHOST_AGENT_HOOK_DIRECTORY";
    pub const SERVER_HOOK_DIRECTORY: &str = "HOOKHOST_SERVER_HOOK_DIRECTORY";
    /// `true` switches log output to JSON.
    pub const LOG_JSON: &str = "HOOKHOST_LOG_JSON";
    /// Prefix of the per-hook settings overrides,
    /// `HOOKHOST_<PROGRAM>_HOOK_<HOOK>_<KEY>`.
    pub const PREFIX: &str = "HOOKHOST";

    /// Whether JSON log output was requested.
    pub fn log_json() -> bool {
        std::env::var(LOG_JSON)
            .map(|value| value.eq_ignore_ascii_case("true") || value == "1")
            .unwrap_or(false)
    }
}

/// Hook directory of `program`: the environment override if set, otherwise
/// the default.
pub fn hook_directory(program: &str) -> Result<PathBuf> {
    let (variable, default) = match program {
        PROGRAM_AGENT => (env_vars::AGENT_HOOK_DIRECTORY, defaults::AGENT_HOOK_DIRECTORY),
        PROGRAM_SERVER => (env_vars::SERVER_HOOK_DIRECTORY, defaults::SERVER_HOOK_DIRECTORY),
        other => return Err(Error::Config(format!("unknown program: {}", other))),
    };

    Ok(std::env::var_os(variable)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default)))
}

/// The `[hooks]` section of a host configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Directory to load hooks from. Falls back to [`hook_directory`].
    pub directory: Option<PathBuf>,
    /// Settings per hook name, merged into the hook's prototype by
    /// [`resolve_settings`](crate::settings::resolve_settings).
    pub settings: HashMap<String, HookSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    hooks: HooksConfig,
}

impl HooksConfig {
    /// Configuration without a file: no settings, directory from the
    /// environment or the default of `program`.
    pub fn for_program(program: &str) -> Result<Self> {
        Ok(Self {
            directory: Some(hook_directory(program)?),
            settings: HashMap::new(),
        })
    }

    /// Parse the `[hooks]` section of a TOML document. A document without it
    /// yields the empty configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("cannot parse hooks configuration: {}", e)))?;

        for (hook, settings) in &file.hooks.settings {
            if !settings.is_object() {
                return Err(Error::Settings {
                    hook: hook.clone(),
                    reason: "settings must be a table".to_string(),
                });
            }
        }

        Ok(file.hooks)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Directory to load the hooks of `program` from.
    pub fn directory_for(&self, program: &str) -> Result<PathBuf> {
        match &self.directory {
            Some(directory) => Ok(directory.clone()),
            None => hook_directory(program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_toml_str() {
        let config = HooksConfig::from_toml_str(
            r#"
            [hooks]
            directory = "/opt/hooks"

            [hooks.settings.audit]
            endpoint = "http://audit.local:8080"
            retries = 3

            [hooks.settings.audit.tls]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.directory, Some(PathBuf::from("/opt/hooks")));
        assert_eq!(
            config.settings["audit"],
            json!({
                "endpoint": "http://audit.local:8080",
                "retries": 3,
                "tls": { "enabled": true }
            })
        );
    }

    #[test]
    fn test_from_toml_str_without_hooks_section() {
        let config = HooksConfig::from_toml_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config, HooksConfig::default());
    }

    #[test]
    fn test_from_toml_str_settings_must_be_table() {
        let err = HooksConfig::from_toml_str("[hooks.settings]\naudit = 42\n").unwrap_err();
        assert!(matches!(err, Error::Settings { ref hook, .. } if hook == "audit"));
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let err = HooksConfig::from_toml_str("[hooks\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_missing_file() {
        let err = HooksConfig::from_file("/non/exist/hookhost.toml").unwrap_err();
        assert!(err.to_string().contains("/non/exist/hookhost.toml"));
    }

    #[test]
    fn test_hook_directory_unknown_program() {
        assert!(hook_directory("foo").is_err());
    }

    #[test]
    fn test_directory_for_prefers_configured() {
        let config = HooksConfig {
            directory: Some(PathBuf::from("/opt/hooks")),
            ..Default::default()
        };
        assert_eq!(config.directory_for(PROGRAM_AGENT).unwrap(), PathBuf::from("/opt/hooks"));
    }
}
