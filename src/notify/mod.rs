//! Outbound notifications.
//!
//! The engine never formats channel markup itself; it hands structured
//! payloads to a [`Notifier`] and remembers the returned message handle so
//! later cycles can edit the same message in place. Send and edit failures
//! are non-fatal: the caller logs them and still advances its state.

mod webhook;
pub use webhook::*;


use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Fingerprint;
use crate::Result;
use crate::Role;

/// Handle to a previously sent channel message, required for in-place edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle(pub String);

/// A create or edit notification for one live watch.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// The watch's display label (a name, a pattern, or a keyword tag)
    pub label: String,
    pub role: Role,
    pub callsign: String,
    pub cid: u64,
    pub fingerprint: Fingerprint,
    /// Field names that changed this cycle; `["initial"]` on create,
    /// `["position"]` on a periodic re-render
    pub updated_keys: Vec<String>,
    /// Epoch seconds of this update
    pub updated_at: u64,
    /// Military rating label, pilots with a nonzero code only
    pub military_rating: Option<String>,
}

/// Terminal notification for a watch whose key left the snapshot.
#[derive(Debug, Clone)]
pub struct OfflineNotice {
    pub label: String,
    pub detail: String,
}

/// A suspected name-policy violation alert.
#[derive(Debug, Clone)]
pub struct PolicyAlert {
    pub name: String,
    pub cid: u64,
    pub callsign: String,
    pub role: Role,
    pub reasons: Vec<String>,
    pub frequency: Option<String>,
    /// Live position at detection time, pilots only
    pub position: Option<(f64, f64)>,
}

/// An advisory-style alert from an external source.
#[derive(Debug, Clone)]
pub struct Advisory {
    pub title: String,
    pub detail: String,
    pub source: String,
    /// Epoch seconds the upstream recorded the event, when known
    pub recorded_at: Option<u64>,
}

/// Renders payloads into channel messages and sends, edits or announces
/// them. May fail; failures are caught per watch and never abort a cycle.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a new message for a watch that just came online.
    async fn send_online(&self, update: &StatusUpdate) -> Result<MessageHandle>;

    /// Edits the watch's existing message in place.
    async fn edit(&self, handle: &MessageHandle, update: &StatusUpdate) -> Result<()>;

    /// Sends a terminal offline message (a new message, never an edit).
    async fn send_offline(&self, notice: &OfflineNotice) -> Result<()>;

    async fn send_alert(&self, alert: &PolicyAlert) -> Result<()>;

    async fn send_advisory(&self, advisory: &Advisory) -> Result<()>;
}
