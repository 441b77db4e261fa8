//! Audit categories and their fixed LDAP filters.

use std::fmt;

/// LDAP bitwise-AND matching rule OID (LDAP_MATCHING_RULE_BIT_AND).
pub const LDAP_MATCHING_RULE_BIT_AND: &str = "1.2.840.113556.1.4.803";

/// userAccountControl flag exempting an account from password rotation
/// (ADS_UF_DONT_EXPIRE_PASSWD).
pub const DONT_EXPIRE_PASSWD: u32 = 0x10000;

const USER_FILTER: &str =
    "(&(objectCategory=person)(objectClass=user)(userAccountControl:1.2.840.113556.1.4.803:=65536))";
const COMPUTER_FILTER: &str =
    "(&(objectCategory=computer)(userAccountControl:1.2.840.113556.1.4.803:=65536))";

/// One of the two fixed account categories audited for a non-expiring
/// password. The filters are immutable constants; no other categories exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountCategory {
    Users,
    Computers,
}

impl AccountCategory {
    /// The LDAP filter matching this category's accounts whose
    /// `DONT_EXPIRE_PASSWD` bit is set.
    pub fn filter(self) -> &'static str {
        match self {
            AccountCategory::Users => USER_FILTER,
            AccountCategory::Computers => COMPUTER_FILTER,
        }
    }

    /// Human-readable label used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            AccountCategory::Users => "user accounts",
            AccountCategory::Computers => "computer accounts",
        }
    }

    /// Categories selected by the two CLI flags. Neither flag set means both
    /// categories run.
    pub fn selected(users: bool, computers: bool) -> Vec<Self> {
        match (users, computers) {
            (true, false) => vec![AccountCategory::Users],
            (false, true) => vec![AccountCategory::Computers],
            _ => vec![AccountCategory::Users, AccountCategory::Computers],
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_carry_bitwise_matching_rule() {
        for category in [AccountCategory::Users, AccountCategory::Computers] {
            let filter = category.filter();
            assert!(filter.contains(LDAP_MATCHING_RULE_BIT_AND));
            assert!(filter.contains(&DONT_EXPIRE_PASSWD.to_string()));
        }
    }

    #[test]
    fn test_user_filter_scopes_to_person_category() {
        assert!(AccountCategory::Users.filter().contains("(objectCategory=person)"));
        assert!(AccountCategory::Users.filter().contains("(objectClass=user)"));
    }

    #[test]
    fn test_computer_filter_scopes_to_computer_category() {
        assert!(AccountCategory::Computers
            .filter()
            .contains("(objectCategory=computer)"));
    }

    #[test]
    fn test_selected_single_flags() {
        assert_eq!(
            AccountCategory::selected(true, false),
            vec![AccountCategory::Users]
        );
        assert_eq!(
            AccountCategory::selected(false, true),
            vec![AccountCategory::Computers]
        );
    }

    #[test]
    fn test_selected_defaults_to_both() {
        let both = vec![AccountCategory::Users, AccountCategory::Computers];
        assert_eq!(AccountCategory::selected(false, false), both);
        assert_eq!(AccountCategory::selected(true, true), both);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(AccountCategory::Users.to_string(), "user accounts");
        assert_eq!(AccountCategory::Computers.to_string(), "computer accounts");
    }
}
