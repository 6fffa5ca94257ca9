// In: src/config.rs

//! The single source of truth for all zstd-bytea configuration.
//!
//! `ExtensionConfig` is created once at the host boundary (from the environment,
//! a JSON file, or plain defaults) and then shared read-only with every SQL
//! function closure via an `Arc<ExtensionConfig>`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ZstdByteaError;

/// Environment variable naming a JSON config file, read by `ExtensionConfig::from_env`.
pub const CONFIG_ENV_VAR: &str = "ZSTD_BYTEA_CONFIG";

//==================================================================================
// I. The Unified ExtensionConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Level used by `compress` when the caller passes no level (or NULL).
    /// The codec, not this crate, decides which levels are valid.
    #[serde(default = "default_level")]
    pub default_level: i32,

    /// Prefix for the registered SQL function names (`<prefix>compress`, ...).
    #[serde(default = "default_function_prefix")]
    pub function_prefix: String,

    /// Log level for the `env_logger` backend installed by the loadable extension.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// If set, log records are appended to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            function_prefix: default_function_prefix(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl ExtensionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ZstdByteaError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ZstdByteaError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Loads the file named by `ZSTD_BYTEA_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ZstdByteaError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ZstdByteaError> {
        let prefix_ok = !self.function_prefix.is_empty()
            && self
                .function_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !self.function_prefix.starts_with(|c: char| c.is_ascii_digit());
        if !prefix_ok {
            return Err(ZstdByteaError::InvalidConfig(format!(
                "function_prefix '{}' is not a valid SQL identifier prefix",
                self.function_prefix
            )));
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<log::LevelFilter, ZstdByteaError> {
        self.log_level.parse().map_err(|_| {
            ZstdByteaError::InvalidConfig(format!("unknown log_level '{}'", self.log_level))
        })
    }

    /// Full SQL name for one of the exported functions.
    pub fn function_name(&self, name: &str) -> String {
        format!("{}{}", self.function_prefix, name)
    }
}

//==================================================================================
// II. Serde Default Helpers
//==================================================================================

fn default_level() -> i32 {
    zstd::DEFAULT_COMPRESSION_LEVEL
}

fn default_function_prefix() -> String {
    "zstd_".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
