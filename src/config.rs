//! Connection settings for the directory audit.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

fn default_port() -> u16 {
    389
}

fn default_page_size() -> u32 {
    1000
}

fn default_connect_timeout() -> u64 {
    30
}

/// Settings for connecting to a directory server.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Directory server hostname or IP address.
    pub host: String,

    /// Port, 389 for plain LDAP and 636 for LDAPS.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connect over LDAPS instead of plain LDAP.
    #[serde(default)]
    pub use_ldaps: bool,

    /// DN or UPN of the bind account.
    pub bind_dn: String,

    /// Bind password. Never serialized.
    #[serde(skip_serializing, default)]
    pub bind_password: Option<String>,

    /// Entries requested per page of search results.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl AuditConfig {
    pub fn new(host: impl Into<String>, bind_dn: impl Into<String>) -> Self {
        AuditConfig {
            host: host.into(),
            port: default_port(),
            use_ldaps: false,
            bind_dn: bind_dn.into(),
            bind_password: None,
            page_size: default_page_size(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_ldaps(mut self) -> Self {
        self.use_ldaps = true;
        if self.port == default_port() {
            self.port = 636;
        }
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// The LDAP URL for this configuration.
    pub fn url(&self) -> String {
        let scheme = if self.use_ldaps { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub fn validate(&self) -> AuditResult<()> {
        if self.host.trim().is_empty() {
            return Err(AuditError::InvalidConfiguration {
                message: "directory server host must not be empty".to_string(),
            });
        }
        if self.bind_dn.trim().is_empty() {
            return Err(AuditError::InvalidConfiguration {
                message: "bind DN must not be empty".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(AuditError::InvalidConfiguration {
                message: "page size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_ldaps", &self.use_ldaps)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_password",
                &self.bind_password.as_ref().map(|_| "********"),
            )
            .field("page_size", &self.page_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::new("dc01.example.com", "audit@example.com");
        assert_eq!(config.port, 389);
        assert!(!config.use_ldaps);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.url(), "ldap://dc01.example.com:389");
    }

    #[test]
    fn test_ldaps_switches_default_port() {
        let config = AuditConfig::new("dc01.example.com", "audit@example.com").with_ldaps();
        assert_eq!(config.port, 636);
        assert_eq!(config.url(), "ldaps://dc01.example.com:636");
    }

    #[test]
    fn test_explicit_port_survives_ldaps() {
        let config = AuditConfig::new("dc01.example.com", "audit@example.com")
            .with_port(3269)
            .with_ldaps();
        assert_eq!(config.port, 3269);
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let config = AuditConfig::new("  ", "audit@example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_bind_dn() {
        let config = AuditConfig::new("dc01.example.com", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config =
            AuditConfig::new("dc01.example.com", "audit@example.com").with_page_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_not_serialized() {
        let config = AuditConfig::new("dc01.example.com", "audit@example.com")
            .with_password("hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let config = AuditConfig::new("dc01.example.com", "audit@example.com")
            .with_password("hunter2");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: AuditConfig = serde_json::from_str(
            r#"{"host": "dc01.example.com", "bind_dn": "audit@example.com"}"#,
        )
        .unwrap();
        assert_eq!(config.port, 389);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.bind_password, None);
    }
}
