//! Directory client and paged enumeration of matching accounts.

use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, info, instrument, warn};

use crate::category::AccountCategory;
use crate::config::AuditConfig;
use crate::entry::{AttributeBag, Record};
use crate::error::{AuditError, AuditResult};
use crate::namespace::SearchNamespace;
use crate::resolver::resolve_record;
use crate::timestamp::GeneralTimeFormats;

/// Attributes requested during enumeration.
pub const SEARCH_ATTRS: [&str; 6] = [
    "name",
    "distinguishedName",
    "whenCreated",
    "lastLogonTimestamp",
    "lastLogon",
    "pwdLastSet",
];

/// Attributes re-read per entry; identity fields come from the cached entry.
const REFRESH_ATTRS: [&str; 4] = [
    "whenCreated",
    "lastLogonTimestamp",
    "lastLogon",
    "pwdLastSet",
];

/// Maps an underlying search failure to a per-category query error.
///
/// Every search failure for a category routes through here; the caller
/// that hits one propagates it before any record for the category is
/// produced.
fn search_failure(
    category: AccountCategory,
    namespace: &SearchNamespace,
    stage: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> AuditError {
    AuditError::directory_query_with_source(
        category.label(),
        format!("search under {} {}", namespace, stage),
        source,
    )
}

/// An authenticated connection to the directory server.
pub struct AuditClient {
    config: AuditConfig,
    ldap: Ldap,
    formats: GeneralTimeFormats,
}

impl AuditClient {
    /// Connects and binds with the credentials in `config`.
    pub async fn connect(config: AuditConfig) -> AuditResult<Self> {
        config.validate()?;

        let url = config.url();
        debug!(url = %url, bind_dn = %config.bind_dn, "connecting to directory server");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(std::time::Duration::from_secs(config.connect_timeout_secs));

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| {
                AuditError::connection_failed_with_source(
                    format!("failed to connect to {}", url),
                    e,
                )
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver terminated");
            }
        });

        let password = config.bind_password.as_deref().unwrap_or_default();
        let result = ldap
            .simple_bind(&config.bind_dn, password)
            .await
            .map_err(|e| {
                AuditError::connection_failed_with_source(
                    format!("bind to {} failed", url),
                    e,
                )
            })?;

        if result.rc == 49 {
            return Err(AuditError::AuthenticationFailed);
        }
        if result.rc != 0 {
            return Err(AuditError::connection_failed(format!(
                "bind to {} failed with result code {}: {}",
                url, result.rc, result.text
            )));
        }

        debug!(url = %url, "bind succeeded");
        Ok(AuditClient {
            config,
            ldap,
            formats: GeneralTimeFormats::default(),
        })
    }

    /// Enumerates all accounts in one category and resolves each into a
    /// record.
    ///
    /// A failed search is fatal for the category; a failed per-entry
    /// refresh is not and falls back to the cached attributes.
    #[instrument(skip(self), fields(category = category.label()))]
    pub async fn enumerate(
        &mut self,
        namespace: &SearchNamespace,
        category: AccountCategory,
    ) -> AuditResult<Vec<Record>> {
        let cached = self.collect_matches(namespace, category).await?;
        let total = cached.len();
        info!(total, "enumeration complete, resolving attributes");

        let mut records = Vec::with_capacity(total);
        for (index, bag) in cached.iter().enumerate() {
            let refreshed = self.refresh_entry(bag.distinguished_name.as_deref()).await;
            records.push(resolve_record(refreshed.as_ref(), bag, &self.formats));
            info!("{} of {} processed", index + 1, total);
        }

        Ok(records)
    }

    /// Runs the paged search for one category and collects the raw
    /// attribute bags.
    async fn collect_matches(
        &mut self,
        namespace: &SearchNamespace,
        category: AccountCategory,
    ) -> AuditResult<Vec<AttributeBag>> {
        let filter = category.filter();
        debug!(base = %namespace, filter, "starting paged search");

        let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(self.config.page_size as i32)),
        ];

        let mut search = self
            .ldap
            .streaming_search_with(
                adapters,
                namespace.as_str(),
                Scope::Subtree,
                filter,
                SEARCH_ATTRS.to_vec(),
            )
            .await
            .map_err(|e| search_failure(category, namespace, "could not be started", e))?;

        let mut bags = Vec::new();
        while let Some(entry) = search
            .next()
            .await
            .map_err(|e| search_failure(category, namespace, "failed while paging", e))?
        {
            bags.push(AttributeBag::from_entry(&SearchEntry::construct(entry)));
        }

        search
            .finish()
            .await
            .success()
            .map_err(|e| search_failure(category, namespace, "did not complete", e))?;

        Ok(bags)
    }

    /// Re-reads the temporal attributes of one entry.
    ///
    /// Any failure, including a missing DN, yields `None` so the caller
    /// falls back to the cached values.
    async fn refresh_entry(&mut self, dn: Option<&str>) -> Option<AttributeBag> {
        let dn = dn?;
        let result = self
            .ldap
            .search(dn, Scope::Base, "(objectClass=*)", REFRESH_ATTRS.to_vec())
            .await;

        match result.and_then(|r| r.success()) {
            Ok((entries, _)) => entries
                .into_iter()
                .next()
                .map(|entry| AttributeBag::from_entry(&SearchEntry::construct(entry))),
            Err(e) => {
                debug!(dn, error = %e, "entry refresh failed, using cached attributes");
                None
            }
        }
    }

    /// Unbinds from the server.
    pub async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            warn!(error = %e, "unbind failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_failure() -> AuditError {
        let namespace = SearchNamespace::resolve("example.com").unwrap();
        search_failure(
            AccountCategory::Users,
            &namespace,
            "could not be started",
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer"),
        )
    }

    #[test]
    fn test_search_failure_is_directory_query_for_the_category() {
        let err = users_failure();
        match &err {
            AuditError::DirectoryQuery {
                category,
                message,
                source,
            } => {
                assert_eq!(category, "user accounts");
                assert!(message.contains("DC=example,DC=com"));
                assert!(source.is_some());
            }
            other => panic!("expected DirectoryQuery, got {:?}", other),
        }
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_search_failure_carries_remediation_hints() {
        let rendered = users_failure().to_string();
        assert!(rendered.contains("Troubleshooting"));
        assert!(rendered.contains("user accounts"));
    }
}
