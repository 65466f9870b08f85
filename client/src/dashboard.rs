//! Usage dashboard driver.
//!
//! Refreshes API usage metrics on a fixed interval and publishes aggregated
//! snapshots through a `watch` channel. Every tick starts a fetch, even if
//! the previous one is still running. Fetches are numbered in the order they
//! were issued and a result is only published if nothing newer has been
//! published yet, so a slow stale response never overwrites a fresh one.

use crate::client::TicketServiceClient;
use chrono::{DateTime, Utc};
use sigil_core::{ApiUsageMetric, MetricsSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// One successful refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Issue order of the fetch that produced this snapshot (starts at 1).
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub metrics: Vec<ApiUsageMetric>,
    pub summary: MetricsSummary,
}

/// What subscribers see.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Sequence of the last published outcome, 0 before the first.
    pub sequence: u64,
    /// Latest successful snapshot; kept when a later refresh fails.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Message of the latest outcome if it was a failure.
    pub last_error: Option<String>,
}

/// Handle to a running dashboard. Dropping it stops the refresh loop and
/// aborts fetches in flight.
pub struct Dashboard {
    state: watch::Receiver<DashboardState>,
    driver: JoinHandle<()>,
}

impl Dashboard {
    /// Start refreshing immediately, then every `interval`.
    pub fn start(client: TicketServiceClient, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(DashboardState::default());
        let driver = tokio::spawn(run(client, interval, tx));
        Self { state: rx, driver }
    }

    /// Start with the refresh interval from the client's configuration.
    pub fn from_config(client: TicketServiceClient) -> Self {
        let interval = client.config().metrics_refresh;
        Self::start(client, interval)
    }

    /// New receiver; `changed()` fires on every published refresh.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    pub fn latest(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Stop refreshing.
    pub fn shutdown(self) {
        self.driver.abort();
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn run(client: TicketServiceClient, interval: Duration, tx: watch::Sender<DashboardState>) {
    let tx = Arc::new(tx);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Owned here so aborting the driver aborts every fetch with it.
    let mut fetches = JoinSet::new();
    let mut issued: u64 = 0;

    info!(interval_ms = interval.as_millis() as u64, "Started usage dashboard");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                issued += 1;
                fetches.spawn(refresh(client.clone(), issued, Arc::clone(&tx)));
            }
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                if let Err(err) = joined {
                    warn!(error = %err, "Metrics refresh task failed");
                }
            }
        }
    }
}

async fn refresh(client: TicketServiceClient, sequence: u64, tx: Arc<watch::Sender<DashboardState>>) {
    let outcome = client.fetch_api_usage_metrics().await;

    let published = tx.send_if_modified(|state| {
        if sequence <= state.sequence {
            return false;
        }
        state.sequence = sequence;
        match &outcome {
            Ok(metrics) => {
                state.snapshot = Some(Arc::new(Snapshot {
                    sequence,
                    fetched_at: Utc::now(),
                    summary: MetricsSummary::from_metrics(metrics),
                    metrics: metrics.clone(),
                }));
                state.last_error = None;
            }
            Err(err) => state.last_error = Some(err.to_string()),
        }
        true
    });

    match (published, &outcome) {
        (false, _) => debug!(sequence, "Dropped stale metrics refresh"),
        (true, Ok(metrics)) => debug!(sequence, count = metrics.len(), "Published metrics refresh"),
        (true, Err(err)) => warn!(sequence, error = %err, "Metrics refresh failed"),
    }
}
