//! Audit error types
//!
//! Error definitions with the structural/data-quality split: structural
//! failures (bad input, bad query) surface here once with remediation hints;
//! attribute-level failures are absorbed into the optional-field model and
//! never reach this type.

use thiserror::Error;

/// Error that can occur during an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The domain or search base supplied by the user is malformed.
    #[error("invalid domain or search base: {message}\n\nCheck that the value is either a DNS domain name with at least two labels\n(e.g. corp.example.com) or a distinguished name (e.g. DC=corp,DC=example,DC=com).")]
    InvalidInput { message: String },

    /// The run configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Failed to establish a connection to the directory server.
    #[error("connection failed: {message}\n\nTroubleshooting:\n  - Verify the server is reachable on port 389 (or 636 for LDAPS)\n  - Check the hostname and any firewall rules in between\n  - Confirm the directory service is running")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid bind credentials.
    #[error("authentication failed: invalid bind credentials")]
    AuthenticationFailed,

    /// A directory search could not be issued or was rejected by the server.
    /// Fatal for one category's enumeration; the caller decides whether the
    /// run continues with the remaining categories.
    #[error("directory query failed for {category}: {message}\n\nTroubleshooting:\n  - Verify the search base DN exists\n  - Check that the bind account has read access to it\n  - Confirm connectivity to the directory server\n  - Validate the LDAP filter syntax")]
    DirectoryQuery {
        category: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to assemble or write the report.
    #[error("report error: {message}")]
    Report {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AuditError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AuditError::InvalidInput { .. } | AuditError::InvalidConfiguration { .. } => 4,
            AuditError::ConnectionFailed { .. } | AuditError::DirectoryQuery { .. } => 3,
            AuditError::AuthenticationFailed => 2,
            AuditError::Report { .. } => 1,
        }
    }

    // Convenience constructors

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AuditError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        AuditError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AuditError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a directory query error for one category.
    pub fn directory_query(category: impl Into<String>, message: impl Into<String>) -> Self {
        AuditError::DirectoryQuery {
            category: category.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a directory query error with source.
    pub fn directory_query_with_source(
        category: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AuditError::DirectoryQuery {
            category: category.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a report error with source.
    pub fn report_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AuditError::Report {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        assert_eq!(AuditError::invalid_input("empty").exit_code(), 4);
        assert_eq!(
            AuditError::InvalidConfiguration {
                message: "bad".to_string()
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn test_exit_code_query_errors() {
        assert_eq!(AuditError::connection_failed("down").exit_code(), 3);
        assert_eq!(
            AuditError::directory_query("user accounts", "rejected").exit_code(),
            3
        );
    }

    #[test]
    fn test_exit_code_auth_and_report() {
        assert_eq!(AuditError::AuthenticationFailed.exit_code(), 2);
        assert_eq!(
            AuditError::Report {
                message: "io".to_string(),
                source: None
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_display_includes_remediation_hints() {
        let err = AuditError::directory_query("computer accounts", "server rejected the search");
        let text = err.to_string();
        assert!(text.contains("computer accounts"));
        assert!(text.contains("search base DN"));
        assert!(text.contains("read access"));
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "underlying");
        let err = AuditError::connection_failed_with_source("failed", source);
        if let AuditError::ConnectionFailed { source, .. } = &err {
            assert!(source.is_some());
        } else {
            panic!("expected ConnectionFailed variant");
        }
    }
}
