//! Watch Engine Error Hierarchy
//!
//! Defines error types for the polling watch-and-notify engine,
//! categorized by subsystem and operational concern.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Data-feed retrieval failures (network, status, payload)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Outbound notification failures (send/edit rejected)
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Watch-list storage failures
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Watch selector compilation failures
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Disk I/O failures outside the store
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

/// Failures retrieving the shared network snapshot or an advisory source.
///
/// Any of these skips the cycle wholesale: a failed fetch is never
/// interpreted as "no participants online".
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Explicit rate-limit signal from the data source (HTTP 429)
    #[error("rate limited by data source: {url}")]
    RateLimited { url: String },

    /// Non-success status without rate-limit semantics
    #[error("unexpected status from {url}: HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// Request deadline elapsed
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Transport-level failures (DNS, TLS, connection reset)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Payload did not decode into the expected schema
    #[error("malformed payload from {url}: {detail}")]
    Malformed { url: String, detail: String },
}

/// Failures sending or editing a channel message.
///
/// Caught per watch and logged; tracker state still advances so a failed
/// render is not retried indefinitely.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The channel endpoint rejected the message
    #[error("notification rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// The channel endpoint returned no message handle for a new message
    #[error("notification accepted but no message handle returned")]
    MissingHandle,

    /// Transport-level failures reaching the channel
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Failures reading or writing the watch-list store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A store document did not parse as JSON
    #[error("malformed store document {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A watch selector that cannot be compiled into a matcher.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid watch pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
