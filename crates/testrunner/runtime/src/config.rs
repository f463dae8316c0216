//! Configuration for the test runner
//!
//! Values are layered: built-in defaults, then an optional file, then
//! `TESTRUNNER_`-prefixed environment variables (nested keys joined with
//! `__`, e.g. `TESTRUNNER_POLICY__TEST_LOAD=true`).

use serde::{Deserialize, Serialize};
use testrunner_policy::PolicyConfig;

/// Main test runner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRunnerConfig {
    /// Enablement switches and automatic run delay
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Execution configuration
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Execution configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Test classes executed at the same time by one dispatch (1 = one after another)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_classes: usize,

    /// Display name of the execution context handed to test instances
    #[serde(default = "default_context_name")]
    pub context_name: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_classes: default_max_concurrent(),
            context_name: default_context_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_max_concurrent() -> usize {
    1
}

fn default_context_name() -> String {
    "testrunner".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TestRunnerConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&TestRunnerConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with TESTRUNNER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("TESTRUNNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TestRunnerConfig::default();
        assert!(config.policy.enabled);
        assert!(config.policy.test_integration);
        assert!(!config.policy.test_load);
        assert_eq!(config.policy.test_delay_seconds, -1);
        assert_eq!(config.execution.max_concurrent_classes, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = TestRunnerConfig::load(Some("/nonexistent/path/testrunner.toml")).unwrap();
        assert_eq!(config.policy, PolicyConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[policy]
test_load = true
test_validity = true
test_delay_seconds = 30

[execution]
max_concurrent_classes = 4
"#
        )
        .unwrap();

        let config = TestRunnerConfig::load(file.path().to_str()).unwrap();
        assert!(config.policy.enabled);
        assert!(config.policy.test_load);
        assert!(config.policy.test_validity);
        assert_eq!(config.policy.test_delay_seconds, 30);
        assert_eq!(config.execution.max_concurrent_classes, 4);
        assert_eq!(config.execution.context_name, "testrunner");
    }
}
