//! Audit of directory accounts whose password never expires.
//!
//! Connects to an Active Directory server, enumerates user and computer
//! accounts carrying the `DONT_EXPIRE_PASSWD` flag, normalizes their
//! temporal attributes and writes a sorted CSV report.

pub mod category;
pub mod config;
pub mod entry;
pub mod enumerator;
pub mod error;
pub mod namespace;
pub mod report;
pub mod resolver;
pub mod timestamp;

pub use category::AccountCategory;
pub use config::AuditConfig;
pub use entry::{AttributeBag, Record};
pub use enumerator::AuditClient;
pub use error::{AuditError, AuditResult};
pub use namespace::SearchNamespace;
