// Unit Tests for Engine Configuration
//
// UNIT UNDER TEST: EngineConfig, RecorderConfig
//
// BUSINESS RESPONSIBILITY:
//   - Provides working defaults so a service can adopt the engine with no setup
//   - Loads overrides from ERROR_CONTRACT_* environment variables
//   - Rejects configurations that would break responses or conflict resolution
//
// TEST COVERAGE:
//   - Default values for headers, masking and status priority
//   - Validation of header names and status priority orders
//   - Environment loading, including invalid priority entries

use crate::catalog::StatusPriority;
use crate::config::{EngineConfig, RecorderConfig, DEFAULT_CORRELATION_HEADER};
use crate::error::{EngineError, ErrorCategory};

#[cfg(test)]
mod defaults_tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        // Test verifies the engine works out of the box
        // Ensures defaults pass the same validation as loaded configs

        // Arrange & Act
        let config = EngineConfig::default();

        // Assert
        assert!(config.validate().is_ok());
        assert_eq!(config.recorder.correlation_header, DEFAULT_CORRELATION_HEADER);
        assert_eq!(config.recorder.trace_id_header, "traceparent");
        assert_eq!(config.status_priority.as_slice()[0], 403);
    }

    #[test]
    fn test_authorization_is_masked_case_insensitively() {
        // Arrange
        let config = RecorderConfig::default();

        // Act & Assert
        assert!(config.is_masked("Authorization"));
        assert!(config.is_masked("AUTHORIZATION"));
        assert!(!config.is_masked("Content-Type"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        // Test verifies serde defaults fill in anything a config file omits

        // Arrange
        let raw = r#"{"recorder": {"correlation_header": "x-request-ref"}}"#;

        // Act
        let config: EngineConfig = serde_json::from_str(raw).expect("parse config");

        // Assert
        assert_eq!(config.recorder.correlation_header, "x-request-ref");
        assert_eq!(config.recorder.mask_token, "[MASKED]");
        assert_eq!(config.status_priority, StatusPriority::default());
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn with_priority(order: Vec<u16>) -> EngineConfig {
        EngineConfig {
            status_priority: StatusPriority::new(order),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_empty_priority_order_is_rejected() {
        // Arrange
        let config = with_priority(vec![]);

        // Act
        let result = config.validate();

        // Assert
        let error = result.expect_err("empty order must fail");
        assert_eq!(error.category(), ErrorCategory::Configuration);
        assert!(error.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_out_of_range_status_is_rejected() {
        // Arrange
        let config = with_priority(vec![403, 700]);

        // Act
        let result = config.validate();

        // Assert
        assert!(matches!(result, Err(EngineError::Configuration { message }) if message.contains("700")));
    }

    #[test]
    fn test_duplicate_status_is_rejected() {
        // Arrange
        let config = with_priority(vec![403, 401, 403]);

        // Act
        let result = config.validate();

        // Assert
        assert!(matches!(result, Err(EngineError::Configuration { message }) if message.contains("more than once")));
    }

    #[test]
    fn test_invalid_correlation_header_is_rejected() {
        // Test verifies header names with separators are refused at startup
        // Ensures responses never carry an unsendable header

        // Arrange
        let mut config = EngineConfig::default();
        config.recorder.correlation_header = "error uid".to_string();

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_trace_id_header_is_rejected() {
        // Arrange
        let mut config = RecorderConfig::default();
        config.trace_id_header = "  ".to_string();

        // Act & Assert
        assert!(config.validate().is_err());
    }
}

#[cfg(test)]
mod from_env_tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "ERROR_CONTRACT_CORRELATION_HEADER",
        "ERROR_CONTRACT_TRACE_ID_HEADER",
        "ERROR_CONTRACT_TRACE_ID_ATTRIBUTE",
        "ERROR_CONTRACT_MASKED_HEADERS",
        "ERROR_CONTRACT_STATUS_PRIORITY",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_uses_defaults() {
        // Arrange
        clear_env();

        // Act
        let config = EngineConfig::from_env().expect("Should create default config");

        // Assert
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        // Test verifies every ERROR_CONTRACT_* variable is honored
        // Ensures masked header names are normalized to lowercase

        // Arrange
        clear_env();
        std::env::set_var("ERROR_CONTRACT_CORRELATION_HEADER", "x-error-ref");
        std::env::set_var("ERROR_CONTRACT_TRACE_ID_HEADER", "x-b3-traceid");
        std::env::set_var("ERROR_CONTRACT_MASKED_HEADERS", "Authorization, Cookie ,X-Api-Key");
        std::env::set_var("ERROR_CONTRACT_STATUS_PRIORITY", "401, 403, 500");

        // Act
        let config = EngineConfig::from_env().expect("Should load overrides");

        // Assert
        assert_eq!(config.recorder.correlation_header, "x-error-ref");
        assert_eq!(config.recorder.trace_id_header, "x-b3-traceid");
        assert!(config.recorder.masked_headers.contains("cookie"));
        assert!(config.recorder.masked_headers.contains("x-api-key"));
        assert!(config.recorder.is_masked("COOKIE"));
        assert_eq!(config.status_priority.as_slice(), &[401, 403, 500]);

        // Cleanup
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_non_numeric_priority() {
        // Arrange
        clear_env();
        std::env::set_var("ERROR_CONTRACT_STATUS_PRIORITY", "401,forbidden");

        // Act
        let result = EngineConfig::from_env();

        // Assert
        assert!(matches!(result, Err(EngineError::Configuration { message }) if message.contains("forbidden")));

        // Cleanup
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_validates_loaded_values() {
        // Arrange
        clear_env();
        std::env::set_var("ERROR_CONTRACT_CORRELATION_HEADER", "bad:header");

        // Act
        let result = EngineConfig::from_env();

        // Assert
        assert!(result.is_err());

        // Cleanup
        clear_env();
    }
}
