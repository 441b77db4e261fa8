//! Attribute resolution with refresh-then-cached fallback.
//!
//! Each temporal attribute is looked up first in the freshly re-read
//! entry and then in the cached entry from the paged search. The two
//! logon attributes add a second layer of preference: the replicated
//! `lastLogonTimestamp` wins over the DC-local `lastLogon` across both
//! tiers.

use crate::entry::{AttributeBag, Record};
use crate::timestamp::{from_file_time, parse_general_date, GeneralTimeFormats};

/// First non-empty value across the refreshed and cached bags.
fn pick<'a>(
    refreshed: Option<&'a AttributeBag>,
    cached: &'a AttributeBag,
    get: fn(&AttributeBag) -> Option<&str>,
) -> Option<&'a str> {
    refreshed.and_then(|bag| get(bag)).or_else(|| get(cached))
}

/// Resolves one account into a normalized record.
///
/// A failed refresh is passed in as `None` and simply drops the first
/// tier; it never surfaces as an error. Identity fields come from the
/// cached entry, which is always present.
pub fn resolve_record(
    refreshed: Option<&AttributeBag>,
    cached: &AttributeBag,
    formats: &GeneralTimeFormats,
) -> Record {
    let creation = parse_general_date(
        pick(refreshed, cached, |b| b.when_created.as_deref()),
        formats,
    );

    // Selection happens on the raw values: a present lastLogonTimestamp
    // wins outright, even when it carries a sentinel that normalizes to
    // unknown. The legacy attribute is consulted only when no
    // lastLogonTimestamp value exists in either tier.
    let last_logon = from_file_time(
        pick(refreshed, cached, |b| b.last_logon_timestamp.as_deref())
            .or_else(|| pick(refreshed, cached, |b| b.last_logon.as_deref())),
    );

    let pwd_last_set = from_file_time(pick(refreshed, cached, |b| b.pwd_last_set.as_deref()));

    Record {
        name: cached.name.clone(),
        creation,
        last_logon,
        pwd_last_set,
        distinguished_name: cached.distinguished_name.clone(),
    }
}
