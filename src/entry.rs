//! Raw directory entries and the finished audit record.
//!
//! [`AttributeBag`] holds the string attribute values exactly as the
//! directory returned them; [`Record`] is the normalized row that ends up
//! in the report.

use chrono::{DateTime, Utc};
use ldap3::SearchEntry;
use serde::Serialize;

/// String attribute values captured from a single directory entry.
///
/// Values are kept verbatim; interpretation happens in the resolver. An
/// empty or missing attribute is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBag {
    pub name: Option<String>,
    pub distinguished_name: Option<String>,
    pub when_created: Option<String>,
    pub last_logon_timestamp: Option<String>,
    pub last_logon: Option<String>,
    pub pwd_last_set: Option<String>,
}

impl AttributeBag {
    /// Builds a bag from an LDAP search entry, taking the first value of
    /// each attribute of interest. The entry DN stands in when the
    /// `distinguishedName` attribute was not returned.
    pub fn from_entry(entry: &SearchEntry) -> Self {
        let distinguished_name = first_value(entry, "distinguishedName").or_else(|| {
            if entry.dn.is_empty() {
                None
            } else {
                Some(entry.dn.clone())
            }
        });

        AttributeBag {
            name: first_value(entry, "name"),
            distinguished_name,
            when_created: first_value(entry, "whenCreated"),
            last_logon_timestamp: first_value(entry, "lastLogonTimestamp"),
            last_logon: first_value(entry, "lastLogon"),
            pwd_last_set: first_value(entry, "pwdLastSet"),
        }
    }
}

/// First non-empty value of an attribute, if any.
fn first_value(entry: &SearchEntry, attr: &str) -> Option<String> {
    entry
        .attrs
        .get(attr)
        .and_then(|values| values.iter().find(|v| !v.is_empty()))
        .cloned()
}

/// A normalized report row for one account.
///
/// Temporal fields are `None` when the directory had no usable value;
/// the report renders those as blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: Option<String>,
    pub creation: Option<DateTime<Utc>>,
    pub last_logon: Option<DateTime<Utc>>,
    pub pwd_last_set: Option<DateTime<Utc>>,
    pub distinguished_name: Option<String>,
}
