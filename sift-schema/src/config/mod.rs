//! Configuration file parsing for `sift.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};

/// Main configuration structure for `sift.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiftConfig {
    /// Filter decoding limits.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl SiftConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let expanded = expand_env_vars(content);

        let config: Self =
            toml::from_str(&expanded).map_err(|e| SchemaError::TomlError { source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-specific overrides and re-validate the result.
    pub fn with_environment(mut self, env: &str) -> SchemaResult<Self> {
        if let Some(overrides) = self.environments.remove(env) {
            if let Some(filter) = overrides.filter {
                if let Some(max_criteria) = filter.max_criteria {
                    self.filter.max_criteria = max_criteria;
                }
                if let Some(max_payload_bytes) = filter.max_payload_bytes {
                    self.filter.max_payload_bytes = max_payload_bytes;
                }
            }
            if let Some(debug) = overrides.debug {
                if let Some(log_filters) = debug.log_filters {
                    self.debug.log_filters = log_filters;
                }
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject limits that would refuse every request.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.filter.max_criteria == 0 {
            return Err(SchemaError::config("filter.max_criteria must be greater than zero"));
        }
        if self.filter.max_payload_bytes == 0 {
            return Err(SchemaError::config(
                "filter.max_payload_bytes must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Limits applied while decoding a filter payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Maximum number of criteria in one payload.
    #[serde(default = "default_max_criteria")]
    pub max_criteria: usize,

    /// Maximum payload size in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_criteria: default_max_criteria(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_max_criteria() -> usize { 64 }
fn default_max_payload_bytes() -> usize { 16 * 1024 }

/// Debug/logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Log every compiled filter at `info` level.
    #[serde(default)]
    pub log_filters: bool,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Filter limit overrides.
    pub filter: Option<FilterOverride>,

    /// Debug overrides.
    pub debug: Option<DebugOverride>,
}

/// Filter limit overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterOverride {
    /// Override max_criteria.
    pub max_criteria: Option<usize>,

    /// Override max_payload_bytes.
    pub max_payload_bytes: Option<usize>,
}

/// Debug configuration overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOverride {
    /// Override log_filters.
    pub log_filters: Option<bool>,
}

/// Expand `${VAR}` references from the process environment.
///
/// Unset variables are left untouched.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let Ok(re) = regex_lite::Regex::new(r"\$\{([^}]+)\}") else {
        return result;
    };

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let full_match = &cap[0];

        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }

    result
}
