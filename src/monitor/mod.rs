//! The cooperative monitor tasks.
//!
//! Each watch type runs as its own periodic task on a shared-nothing model:
//! every monitor owns its tracker state and performs its own snapshot
//! fetch, trading redundant network calls for isolation. All monitors wait
//! on the same select-loop shape: a biased shutdown branch, then the tick.

mod account;
mod advisory;
mod aircraft_type;
mod bulletin;
mod callsign;
mod keyword;
mod name_policy;
mod new_account;

pub use account::*;
pub use advisory::*;
pub use aircraft_type::*;
pub use bulletin::*;
pub use callsign::*;
pub use keyword::*;
pub use name_policy::*;
pub use new_account::*;

#[cfg(test)]
mod advisory_test;
#[cfg(test)]
mod name_policy_test;

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::interval;
use tokio::time::MissedTickBehavior;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::build_fingerprint;
use crate::military_rating_label;
use crate::MonitorConfig;
use crate::Observation;
use crate::Participant;
use crate::Result;
use crate::Role;

/// One periodic watch task: a name for logs, a poll period, and the work
/// done each cycle. A tick that fails skips the cycle without touching any
/// tracker state.
#[async_trait]
pub trait Monitor: Send {
    fn name(&self) -> &'static str;

    fn poll_interval(&self) -> Duration;

    async fn tick(&mut self) -> Result<()>;
}

/// Drives one monitor until the shutdown signal fires.
pub async fn run_monitor<M: Monitor>(
    mut monitor: M,
    mut shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    let mut ticker = interval(monitor.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Use biased to ensure branch order
            biased;
            // P0: shutdown received
            _ = shutdown_signal.changed() => {
                warn!("[{}] shutdown signal received.", monitor.name());
                return Ok(());
            }
            // P1: Tick: run one fetch-match-diff-notify cycle
            _ = ticker.tick() => {
                trace!("[{}] receive tick", monitor.name());
                if let Err(e) = monitor.tick().await {
                    error!("[{}] tick failed: {:?}", monitor.name(), e);
                }
            }
        }
    }
}

/// Projects the representative matching participant into the tracker's
/// observation, picking the refresh cadence by role.
pub(crate) fn observation_for(
    label: &str,
    participant: &Participant<'_>,
    settings: &MonitorConfig,
) -> Observation {
    let refresh_interval_secs = match participant.role() {
        Role::Pilot => settings.pilot_refresh_in_secs,
        Role::Controller | Role::Atis => settings.controller_refresh_in_secs,
    };
    let military_rating = match participant {
        Participant::Pilot(pilot) => pilot
            .military_rating
            .filter(|code| *code > 0)
            .map(military_rating_label),
        _ => None,
    };

    Observation {
        label: label.to_string(),
        role: participant.role(),
        callsign: participant.callsign().to_string(),
        cid: participant.cid(),
        fingerprint: build_fingerprint(participant),
        refresh_interval_secs,
        military_rating,
    }
}
