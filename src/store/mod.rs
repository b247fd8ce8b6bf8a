//! Watch-list storage.
//!
//! Watches are created and removed by an external command front end; the
//! engine only ever reads them, fresh each cycle, so additions and removals
//! take effect without a restart. A missing or malformed document yields
//! the empty value: a broken store never aborts a cycle.

mod file_store;
pub use file_store::*;

#[cfg(test)]
mod file_store_test;

use std::collections::HashSet;

#[cfg(test)]
use mockall::automock;

use crate::Result;

/// One account-id subscription: account id to display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountWatch {
    pub cid: u64,
    pub label: String,
}

/// One wildcard-pattern subscription: selector pattern to display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWatch {
    pub pattern: String,
    pub label: String,
}

/// The two independent keyword rule books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleBook {
    A1,
    A9,
}

impl std::fmt::Display for RuleBook {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            RuleBook::A1 => f.write_str("A1"),
            RuleBook::A9 => f.write_str("A9"),
        }
    }
}

/// Configuration source for every watch type, read fresh each cycle.
#[cfg_attr(test, automock)]
pub trait WatchStore: Send + Sync {
    fn account_watches(&self) -> Vec<AccountWatch>;
    fn callsign_watches(&self) -> Vec<PatternWatch>;
    fn type_watches(&self) -> Vec<PatternWatch>;
    fn keyword_watches(&self, book: RuleBook) -> Vec<String>;
    fn fake_name_patterns(&self) -> Vec<String>;

    /// Whether name-policy alerts are muted. Defaults to muted when the
    /// store cannot be read.
    fn policy_alerts_muted(&self) -> bool;
    /// Whether advisory alerts are muted. Defaults to unmuted.
    fn advisories_muted(&self) -> bool;

    fn highest_account(&self) -> u64;
    fn record_highest_account(&self, cid: u64) -> Result<()>;

    fn seen_advisories(&self) -> HashSet<String>;
    fn record_seen_advisories(&self, seen: &HashSet<String>) -> Result<()>;

    fn seen_bulletins(&self) -> HashSet<String>;
    fn record_seen_bulletins(&self, seen: &HashSet<String>) -> Result<()>;
}
