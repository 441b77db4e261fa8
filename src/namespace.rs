//! Search namespace resolution.
//!
//! Converts a human-supplied domain name or literal distinguished name into
//! the search base for all directory queries. Pure string transformation; no
//! directory access happens here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// The hierarchical search base under which all directory searches are scoped
/// (e.g. `DC=corp,DC=example,DC=com`).
///
/// Computed once per invocation and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchNamespace(String);

impl SearchNamespace {
    /// Resolve a domain name or distinguished name into a search namespace.
    ///
    /// - Input containing `DC=` (any case) is taken as a ready search base
    ///   and passed through unchanged.
    /// - A dotted domain name becomes one `DC=` component per label, in
    ///   order: `corp.example.com` -> `DC=corp,DC=example,DC=com`.
    /// - Empty input, a bare single-label name, or empty labels fail with
    ///   `InvalidInput` before any directory access is attempted.
    pub fn resolve(input: &str) -> AuditResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AuditError::invalid_input("domain or search base is empty"));
        }

        // The caller already supplied a distinguished name.
        if trimmed.to_ascii_uppercase().contains("DC=") {
            return Ok(Self(trimmed.to_string()));
        }

        let labels: Vec<&str> = trimmed.split('.').collect();
        if labels.len() < 2 {
            return Err(AuditError::invalid_input(format!(
                "'{trimmed}' has fewer than two labels and cannot form a search base"
            )));
        }
        if labels.iter().any(|label| label.is_empty()) {
            return Err(AuditError::invalid_input(format!(
                "'{trimmed}' contains an empty label"
            )));
        }

        let base_dn = labels
            .iter()
            .map(|label| format!("DC={label}"))
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self(base_dn))
    }

    /// The namespace as a search base string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_two_label_domain() {
        let ns = SearchNamespace::resolve("example.com").unwrap();
        assert_eq!(ns.as_str(), "DC=example,DC=com");
    }

    #[test]
    fn test_resolve_preserves_label_order_and_count() {
        let ns = SearchNamespace::resolve("example.com.tr").unwrap();
        assert_eq!(ns.as_str(), "DC=example,DC=com,DC=tr");
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let ns = SearchNamespace::resolve("  corp.example.com  ").unwrap();
        assert_eq!(ns.as_str(), "DC=corp,DC=example,DC=com");
    }

    #[test]
    fn test_resolve_dn_passthrough() {
        let ns = SearchNamespace::resolve("DC=corp,DC=example,DC=com").unwrap();
        assert_eq!(ns.as_str(), "DC=corp,DC=example,DC=com");
    }

    #[test]
    fn test_resolve_dn_passthrough_case_insensitive() {
        // Lowercase marker is still a DN; original casing is preserved.
        let ns = SearchNamespace::resolve("ou=Staff,dc=example,dc=com").unwrap();
        assert_eq!(ns.as_str(), "ou=Staff,dc=example,dc=com");
    }

    #[test]
    fn test_resolve_empty_input_fails() {
        assert!(matches!(
            SearchNamespace::resolve(""),
            Err(AuditError::InvalidInput { .. })
        ));
        assert!(matches!(
            SearchNamespace::resolve("   "),
            Err(AuditError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_resolve_single_label_fails() {
        assert!(matches!(
            SearchNamespace::resolve("x"),
            Err(AuditError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_resolve_empty_label_fails() {
        assert!(matches!(
            SearchNamespace::resolve("example..com"),
            Err(AuditError::InvalidInput { .. })
        ));
        assert!(matches!(
            SearchNamespace::resolve("example.com."),
            Err(AuditError::InvalidInput { .. })
        ));
    }
}
