use thiserror::Error;

/// Errors surfaced by the provider's lifecycle verbs
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid input property '{property}': {message}")]
    Validation { property: String, message: String },

    #[error(
        "Application with object ID {object_id} did not become {} after {attempts} attempts",
        expectation(.expected_present)
    )]
    Timeout {
        object_id: String,
        expected_present: bool,
        attempts: u32,
    },

    #[error("{tool} failed: {diagnostics}")]
    ExternalTool { tool: String, diagnostics: String },

    #[error("{operation} is not supported by this provider")]
    Unsupported { operation: String },

    #[error("{verb}: unknown resource type '{type_token}'")]
    UnknownResourceType { verb: String, type_token: String },

    #[error("Invalid URN: {0}")]
    InvalidUrn(String),

    #[error("unknown Invoke token '{0}'")]
    UnknownInvokeToken(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Create a new Validation error for a property
    pub fn validation(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a Validation error for a required property that is absent
    pub fn missing_property(property: impl Into<String>) -> Self {
        let property = property.into();
        let message = format!("missing required input property '{property}'");
        Self::Validation { property, message }
    }

    /// Create a new Timeout error
    pub fn timeout(object_id: impl Into<String>, expected_present: bool, attempts: u32) -> Self {
        Self::Timeout {
            object_id: object_id.into(),
            expected_present,
            attempts,
        }
    }

    /// Create a new ExternalTool error carrying the tool's raw diagnostics
    pub fn external_tool(tool: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Create a new Unsupported error
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new UnknownResourceType error
    pub fn unknown_resource_type(verb: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self::UnknownResourceType {
            verb: verb.into(),
            type_token: type_token.into(),
        }
    }

    /// Create a new InvalidUrn error
    pub fn invalid_urn(urn: impl Into<String>) -> Self {
        Self::InvalidUrn(urn.into())
    }

    /// Get error category for logging and response mapping
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::ExternalTool { .. } => ErrorCategory::ExternalTool,
            Self::Unsupported { .. } => ErrorCategory::Unsupported,
            Self::UnknownResourceType { .. } | Self::InvalidUrn(_) | Self::UnknownInvokeToken(_) => {
                ErrorCategory::Protocol
            }
            Self::Json(_) => ErrorCategory::Serialization,
        }
    }
}

fn expectation(expected_present: &bool) -> &'static str {
    if *expected_present { "present" } else { "absent" }
}

/// Error categories for logging and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Timeout,
    ExternalTool,
    Unsupported,
    Protocol,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Timeout => write!(f, "timeout"),
            Self::ExternalTool => write!(f, "external_tool"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Protocol => write!(f, "protocol"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_property_names_the_property() {
        let err = ProviderError::missing_property("hostName");
        assert_eq!(
            err.to_string(),
            "Invalid input property 'hostName': missing required input property 'hostName'"
        );
        assert!(matches!(
            err,
            ProviderError::Validation { ref property, .. } if property == "hostName"
        ));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_timeout_message_names_expectation() {
        let present = ProviderError::timeout("abc-123", true, 30);
        assert_eq!(
            present.to_string(),
            "Application with object ID abc-123 did not become present after 30 attempts"
        );

        let absent = ProviderError::timeout("abc-123", false, 30);
        assert!(absent.to_string().contains("did not become absent"));
        assert_eq!(absent.category(), ErrorCategory::Timeout);
    }

    #[test]
    fn test_external_tool_keeps_diagnostics() {
        let err = ProviderError::external_tool("az", "az failed with exit status: 1\nForbidden");
        assert!(err.to_string().contains("Forbidden"));
        assert_eq!(err.category(), ErrorCategory::ExternalTool);
    }

    #[test]
    fn test_unknown_resource_type_message() {
        let err = ProviderError::unknown_resource_type("Create", "acme:index:Widget");
        assert_eq!(err.to_string(), "Create: unknown resource type 'acme:index:Widget'");
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: ProviderError = json_err.into();
        assert!(matches!(err, ProviderError::Json(_)));
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Timeout.to_string(), "timeout");
        assert_eq!(ErrorCategory::ExternalTool.to_string(), "external_tool");
        assert_eq!(ErrorCategory::Unsupported.to_string(), "unsupported");
        assert_eq!(ErrorCategory::Protocol.to_string(), "protocol");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
    }
}
