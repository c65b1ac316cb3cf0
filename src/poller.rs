//! Event poller.
//!
//! Fetches `/api/events/current` immediately on startup and then on a fixed
//! interval for the lifetime of the process. There is no backoff and no
//! retry: a failed poll logs and leaves the previous indicator in place
//! until the next scheduled tick. Each successful poll replaces the held
//! snapshot wholesale.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use crate::gateway::{EventSnapshot, GatewayClient};
use crate::session::Effect;

/// Consecutive failures before the log level escalates from warn to error.
const FAILURE_ESCALATION: u32 = 5;

#[derive(Debug, Default)]
struct PollerShared {
    snapshot: Mutex<EventSnapshot>,
    welcome_fired: AtomicBool,
}

/// Read-only view of the poller's last snapshot. Display only; never feeds
/// back into gateway requests.
#[derive(Debug, Clone)]
pub struct PollerHandle {
    shared: Arc<PollerShared>,
}

impl PollerHandle {
    pub fn affection_bonus(&self) -> i64 {
        self.shared.snapshot.lock().expect("poller lock poisoned").affection_bonus
    }

    pub fn current_themes(&self) -> Vec<String> {
        self.shared.snapshot.lock().expect("poller lock poisoned").current_themes.clone()
    }

    pub fn has_active_events(&self) -> bool {
        self.shared.snapshot.lock().expect("poller lock poisoned").has_active_events()
    }
}

/// Periodic fetcher for the event schedule.
pub struct EventPoller {
    gateway: GatewayClient,
    shared: Arc<PollerShared>,
}

impl EventPoller {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway, shared: Arc::new(PollerShared::default()) }
    }

    /// Accessors that remain valid while [`run`](Self::run) owns the poller.
    pub fn handle(&self) -> PollerHandle {
        PollerHandle { shared: Arc::clone(&self.shared) }
    }

    /// Store a fresh snapshot and emit its render effects.
    ///
    /// The indicator effect always fires (replace-not-merge: the renderer
    /// removes any prior indicator even when the new list is empty). The
    /// welcome override fires exactly once per process lifetime, on the
    /// first successful poll that carries a message.
    pub fn apply_snapshot<F: FnMut(&Effect)>(&self, snapshot: EventSnapshot, emit: &mut F) {
        let welcome = snapshot.welcome_message.clone();
        *self.shared.snapshot.lock().expect("poller lock poisoned") = snapshot.clone();

        emit(&Effect::RenderEventIndicator(snapshot));

        if !self.shared.welcome_fired.swap(true, Ordering::SeqCst) {
            if let Some(message) = welcome {
                emit(&Effect::OverrideWelcome(message));
            }
        }
    }

    /// Run the polling loop indefinitely: one immediate fetch, then one per
    /// configured interval. Cancel the task (drop the `JoinHandle`) to stop.
    pub async fn run<F: FnMut(&Effect) + Send>(self, mut emit: F) {
        let mut ticker = tokio::time::interval(self.gateway.config().poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut consecutive_failures: u32 = 0;

        loop {
            // First tick completes immediately, giving the startup fetch.
            ticker.tick().await;

            match self.gateway.fetch_events().await {
                Ok(snapshot) => {
                    consecutive_failures = 0;
                    self.apply_snapshot(snapshot, &mut emit);
                }
                Err(e) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    if consecutive_failures >= FAILURE_ESCALATION {
                        error!(
                            error = %e,
                            url = %self.gateway.config().base_url,
                            consecutive_failures,
                            "event poll failed repeatedly, will retry next tick"
                        );
                    } else {
                        warn!(
                            error = %e,
                            url = %self.gateway.config().base_url,
                            "event poll failed, keeping previous indicator"
                        );
                    }
                }
            }
        }
    }
}
