use super::types::AlertDeskError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Transient errors may succeed if the operator simply tries again.
    pub transient: bool,
}

impl AlertDeskError {
    /// Classify this error so callers can tell network trouble from rejected input.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            AlertDeskError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                transient: true,
            },
            AlertDeskError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                transient: true,
            },
            AlertDeskError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                transient: true,
            },
            AlertDeskError::Io(_) => ErrorClassification {
                error_type: "IoError",
                transient: true,
            },

            AlertDeskError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                transient: false,
            },
            AlertDeskError::Validation(_) => ErrorClassification {
                error_type: "ValidationError",
                transient: false,
            },
            AlertDeskError::InvalidTransition(_) => ErrorClassification {
                error_type: "InvalidTransitionError",
                transient: false,
            },
            AlertDeskError::NotFound(_) => ErrorClassification {
                error_type: "NotFoundError",
                transient: false,
            },
            AlertDeskError::Gateway(_) => ErrorClassification {
                error_type: "GatewayError",
                transient: false,
            },
            AlertDeskError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                transient: false,
            },
            AlertDeskError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                transient: false,
            },
            AlertDeskError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                transient: false,
            },
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            AlertDeskError::Config(_) | AlertDeskError::Yaml(_) => 2,
            AlertDeskError::Network(_) | AlertDeskError::Timeout(_) => 3,
            AlertDeskError::Validation(_) | AlertDeskError::InvalidTransition(_) => 4,
            AlertDeskError::NotFound(_) => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_transient() {
        let err = AlertDeskError::Network("connection refused".into());
        let class = err.classify();
        assert!(class.transient);
        assert_eq!(class.error_type, "NetworkError");
    }

    #[test]
    fn test_validation_not_transient() {
        let err = AlertDeskError::Validation("no records selected".into());
        let class = err.classify();
        assert!(!class.transient);
        assert_eq!(class.error_type, "ValidationError");
    }

    #[test]
    fn test_timeout_transient() {
        assert!(AlertDeskError::Timeout("timed out".into()).classify().transient);
    }

    #[test]
    fn test_gateway_rejection_not_transient() {
        assert!(!AlertDeskError::Gateway("422".into()).classify().transient);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AlertDeskError::Config("x".into()).exit_code(), 2);
        assert_eq!(AlertDeskError::Network("x".into()).exit_code(), 3);
        assert_eq!(AlertDeskError::Validation("x".into()).exit_code(), 4);
        assert_eq!(AlertDeskError::NotFound("x".into()).exit_code(), 5);
        assert_eq!(AlertDeskError::Internal("x".into()).exit_code(), 1);
    }
}
