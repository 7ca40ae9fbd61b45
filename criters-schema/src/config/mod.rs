//! Configuration file parsing for `criters.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};

/// Main configuration structure for `criters.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CritersConfig {
    /// Schema file configuration.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Filter compilation settings.
    #[serde(default)]
    pub compile: CompileConfig,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl CritersConfig {
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
        let expanded = expand_env_vars(content)?;

        toml::from_str(&expanded).map_err(|e| SchemaError::TomlError { source: e })
    }

    /// Apply environment-specific overrides.
    pub fn with_environment(mut self, env: &str) -> Self {
        if let Some(overrides) = self.environments.remove(env) {
            if let Some(schema) = overrides.schema {
                if let Some(path) = schema.path {
                    self.schema.path = path;
                }
            }
            if let Some(compile) = overrides.compile {
                if let Some(error_mode) = compile.error_mode {
                    self.compile.error_mode = error_mode;
                }
            }
            if let Some(debug) = overrides.debug {
                if let Some(level) = debug.log_level {
                    self.debug.log_level = level;
                }
                if let Some(format) = debug.log_format {
                    self.debug.log_format = format;
                }
            }
        }
        self
    }
}

/// Schema file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Path to the schema file.
    #[serde(default = "default_schema_path")]
    pub path: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
        }
    }
}

fn default_schema_path() -> String {
    "schema.criters".to_string()
}

/// Filter compilation configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompileConfig {
    /// How rule failures are reported.
    #[serde(default)]
    pub error_mode: ErrorMode,
}

/// How the compiler reports rule failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Stop at the first failing rule.
    #[default]
    FailFast,
    /// Keep processing independent rules and report every failure.
    Aggregate,
}

/// Debug/logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(SchemaError::ConfigError {
                message: format!("unknown log format '{other}'"),
            }),
        }
    }
}

/// Environment-specific overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Schema overrides.
    pub schema: Option<SchemaOverride>,
    /// Compile overrides.
    pub compile: Option<CompileOverride>,
    /// Debug overrides.
    pub debug: Option<DebugOverride>,
}

/// Schema override for an environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaOverride {
    /// Schema path override.
    pub path: Option<String>,
}

/// Compile override for an environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompileOverride {
    /// Error mode override.
    pub error_mode: Option<ErrorMode>,
}

/// Debug override for an environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOverride {
    /// Log level override.
    pub log_level: Option<String>,
    /// Log format override.
    pub log_format: Option<LogFormat>,
}

/// Expand `${VAR}` and `${VAR:-default}` references.
///
/// Unset variables without a default are left as written.
fn expand_env_vars(content: &str) -> SchemaResult<String> {
    let re = regex_lite::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").map_err(
        |e| SchemaError::ConfigError {
            message: e.to_string(),
        },
    )?;

    let expanded = re.replace_all(content, |caps: &regex_lite::Captures<'_>| {
        match std::env::var(&caps[1]) {
            Ok(value) => value,
            Err(_) => caps
                .get(2)
                .map(|default| default.as_str().to_string())
                .unwrap_or_else(|| caps[0].to_string()),
        }
    });

    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CritersConfig::default();
        assert_eq!(config.schema.path, "schema.criters");
        assert_eq!(config.compile.error_mode, ErrorMode::FailFast);
        assert_eq!(config.debug.log_level, "warn");
        assert_eq!(config.debug.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [schema]
            path = "models.criters"

            [compile]
            error_mode = "aggregate"

            [debug]
            log_level = "trace"
            log_format = "json"
        "#;

        let config = CritersConfig::from_str(toml).unwrap();
        assert_eq!(config.schema.path, "models.criters");
        assert_eq!(config.compile.error_mode, ErrorMode::Aggregate);
        assert_eq!(config.debug.log_level, "trace");
        assert_eq!(config.debug.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CritersConfig::from_str("[compile]\nstrict = true\n").unwrap_err();
        assert!(matches!(err, SchemaError::TomlError { .. }));
    }

    #[test]
    fn test_environment_override() {
        let toml = r#"
            [compile]
            error_mode = "fail_fast"

            [environments.test.compile]
            error_mode = "aggregate"

            [environments.test.debug]
            log_level = "debug"
        "#;

        let config = CritersConfig::from_str(toml).unwrap().with_environment("test");
        assert_eq!(config.compile.error_mode, ErrorMode::Aggregate);
        assert_eq!(config.debug.log_level, "debug");
        assert!(config.environments.is_empty());
    }

    #[test]
    fn test_missing_environment_is_noop() {
        let config = CritersConfig::default().with_environment("production");
        assert_eq!(config.compile.error_mode, ErrorMode::FailFast);
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: the variable name is unique to this test.
        unsafe {
            std::env::set_var("CRITERS_TEST_SCHEMA_PATH", "env.criters");
        }
        let expanded = expand_env_vars("path = \"${CRITERS_TEST_SCHEMA_PATH}\"").unwrap();
        assert_eq!(expanded, "path = \"env.criters\"");
        unsafe {
            std::env::remove_var("CRITERS_TEST_SCHEMA_PATH");
        }
    }

    #[test]
    fn test_env_var_default() {
        let expanded = expand_env_vars("level = \"${CRITERS_TEST_UNSET_LEVEL:-info}\"").unwrap();
        assert_eq!(expanded, "level = \"info\"");

        let untouched = expand_env_vars("level = \"${CRITERS_TEST_UNSET_LEVEL}\"").unwrap();
        assert_eq!(untouched, "level = \"${CRITERS_TEST_UNSET_LEVEL}\"");
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
