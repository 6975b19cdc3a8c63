//! Backend availability tracking.
//!
//! Calls and health probes race each other, so every observation takes a
//! [`Ticket`] before it starts. An observation is applied only if its
//! ticket is newer than the last applied one; a slow response that lands
//! after a fresher one is dropped instead of overwriting it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{BackendClient, BackendError, BackendRequest};

/// Ordering token for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Last applied view of the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendStatus {
    /// Whether the last applied observation reached the backend.
    pub online: bool,
    /// When the last applied observation completed.
    pub last_checked: Option<DateTime<Utc>>,
    /// Error from the last applied observation, if it failed.
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct Applied {
    ticket: u64,
    status: BackendStatus,
}

/// Shared, last-write-wins record of backend availability.
#[derive(Debug, Default)]
pub struct BackendMonitor {
    next_ticket: AtomicU64,
    applied: Mutex<Applied>,
}

impl BackendMonitor {
    /// Creates a monitor that reports the backend offline until the first
    /// observation lands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a ticket for an observation about to start.
    pub fn begin(&self) -> Ticket {
        Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Records a successful observation. Returns whether it was applied.
    pub fn record_success(&self, ticket: Ticket) -> bool {
        self.apply(
            ticket,
            BackendStatus {
                online: true,
                last_checked: Some(Utc::now()),
                last_error: None,
            },
        )
    }

    /// Records a failed observation. Returns whether it was applied.
    pub fn record_failure(&self, ticket: Ticket, error: &BackendError) -> bool {
        self.apply(
            ticket,
            BackendStatus {
                online: false,
                last_checked: Some(Utc::now()),
                last_error: Some(error.to_string()),
            },
        )
    }

    /// Current view of the backend.
    #[must_use]
    pub fn status(&self) -> BackendStatus {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status
            .clone()
    }

    fn apply(&self, ticket: Ticket, status: BackendStatus) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.0 <= applied.ticket {
            log::debug!(
                "Dropping stale backend observation {} (latest applied {})",
                ticket.0,
                applied.ticket
            );
            return false;
        }
        if applied.status.online != status.online {
            log::info!(
                "Backend is now {}",
                if status.online { "online" } else { "offline" }
            );
        }
        applied.ticket = ticket.0;
        applied.status = status;
        true
    }
}

/// Probes `health_path` every `interval` until the task is dropped.
///
/// Probe outcomes are recorded on the client's monitor like any other
/// call.
pub async fn poll_forever(client: Arc<BackendClient>, health_path: String, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let request = BackendRequest::Get {
            path: health_path.clone(),
        };
        if client.proxy_json(request).await.is_ok() {
            log::trace!("Backend health probe succeeded");
        }
    }
}
