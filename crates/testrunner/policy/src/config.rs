//! Initial policy values

use serde::{Deserialize, Serialize};
use testrunner_types::TestsType;

/// Policy configuration, as supplied by the host at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Allow this service to run tests at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Run integration tests
    #[serde(default = "default_true")]
    pub test_integration: bool,

    /// Run load tests (costly, not for production)
    #[serde(default)]
    pub test_load: bool,

    /// Run data validation tests (costly, for after migrations)
    #[serde(default)]
    pub test_validity: bool,

    /// Seconds before the automatic startup run: negative disables it,
    /// zero runs during initialisation
    #[serde(default = "default_delay")]
    pub test_delay_seconds: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            test_integration: true,
            test_load: false,
            test_validity: false,
            test_delay_seconds: -1,
        }
    }
}

impl PolicyConfig {
    /// Everything switched on, no automatic run
    pub fn all_enabled() -> Self {
        Self {
            enabled: true,
            test_integration: true,
            test_load: true,
            test_validity: true,
            test_delay_seconds: -1,
        }
    }

    /// The stored switch for a type, ignoring the global switch
    pub fn flag(&self, tests_type: TestsType) -> bool {
        match tests_type {
            TestsType::Integration => self.test_integration,
            TestsType::Load => self.test_load,
            TestsType::Validation => self.test_validity,
        }
    }

    /// One-line description for the startup log
    pub fn describe(&self) -> String {
        fn on_off(value: bool) -> &'static str {
            if value {
                "on"
            } else {
                "OFF"
            }
        }

        let automatic = if self.test_delay_seconds >= 0 {
            format!("on ({} secs)", self.test_delay_seconds)
        } else {
            "OFF".to_string()
        };

        format!(
            "Testrunner is {}: integration testing: {}: load testing: {}: data validation testing: {}: automatic tests: {}",
            if self.enabled { "enabled" } else { "DISABLED" },
            on_off(self.test_integration),
            on_off(self.test_load),
            on_off(self.test_validity),
            automatic
        )
    }
}

fn default_true() -> bool {
    true
}

fn default_delay() -> i64 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PolicyConfig::default();
        assert!(config.enabled);
        assert!(config.flag(TestsType::Integration));
        assert!(!config.flag(TestsType::Load));
        assert!(!config.flag(TestsType::Validation));
        assert_eq!(config.test_delay_seconds, -1);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: PolicyConfig = serde_json::from_str(r#"{"test_load": true}"#).unwrap();
        assert!(config.enabled);
        assert!(config.test_integration);
        assert!(config.test_load);
        assert_eq!(config.test_delay_seconds, -1);
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            PolicyConfig::default().describe(),
            "Testrunner is enabled: integration testing: on: load testing: OFF: data validation testing: OFF: automatic tests: OFF"
        );

        let config = PolicyConfig {
            enabled: false,
            test_delay_seconds: 30,
            ..PolicyConfig::all_enabled()
        };
        assert!(config.describe().starts_with("Testrunner is DISABLED"));
        assert!(config.describe().ends_with("automatic tests: on (30 secs)"));
    }
}
