// Background refresh task: polls both upstream sources on a fixed cadence,
// normalizes and resolves the result, and publishes snapshots to the cache.
// At most one refresh runs at a time; triggers arriving mid-refresh coalesce.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, interval, timeout};

use crate::cache::SnapshotCache;
use crate::models::{MetadataInventory, RuntimeRecord, Snapshot, SourceHealth};
use crate::normalize::normalize;
use crate::resolve::resolve;
use crate::sources::{MetadataSource, RuntimeSource, UpstreamError};

/// Sources, channels, and shutdown for the refresher.
pub struct RefresherDeps {
    pub cache: Arc<SnapshotCache>,
    pub metadata: Arc<dyn MetadataSource>,
    pub runtime: Arc<dyn RuntimeSource>,
    pub trigger_rx: mpsc::Receiver<()>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Refresher timing and resolution config.
pub struct RefresherConfig {
    pub interval_secs: u64,
    /// Per-upstream budget; a call past this counts as failed for the cycle.
    pub upstream_timeout_secs: u64,
    /// How often to log refresh totals (real seconds).
    pub stats_log_interval_secs: u64,
    /// Address substituted for [IP] on host-networked entries.
    pub host_address: Option<String>,
}

/// How one refresh cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both sources answered; the snapshot is fully fresh.
    Published,
    /// One source failed; its last known-good payload was reused.
    PartiallyPublished,
    /// Both sources failed; the previous snapshot stays as-is.
    Failed,
}

/// Last known-good payload per source, reused when a source fails a cycle.
#[derive(Default)]
struct RefreshState {
    inventory: Option<MetadataInventory>,
    network: Option<Vec<RuntimeRecord>>,
}

pub fn spawn(deps: RefresherDeps, config: RefresherConfig) -> tokio::task::JoinHandle<()> {
    let RefresherDeps {
        cache,
        metadata,
        runtime,
        mut trigger_rx,
        mut shutdown_rx,
    } = deps;

    let upstream_timeout = Duration::from_secs(config.upstream_timeout_secs);
    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(config.interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut state = RefreshState::default();
        let mut published_total: u64 = 0;
        let mut partial_total: u64 = 0;
        let mut failed_total: u64 = 0;
        let mut manual_total: u64 = 0;

        loop {
            tokio::select! {
                // The first tick fires immediately; that is the startup refresh.
                _ = tick.tick() => {
                    let outcome = run_guarded(
                        &cache,
                        &metadata,
                        &runtime,
                        &mut trigger_rx,
                        &mut state,
                        upstream_timeout,
                        config.host_address.as_deref(),
                    )
                    .await;
                    count(outcome, &mut published_total, &mut partial_total, &mut failed_total);
                }
                Some(_) = trigger_rx.recv() => {
                    manual_total += 1;
                    let outcome = run_guarded(
                        &cache,
                        &metadata,
                        &runtime,
                        &mut trigger_rx,
                        &mut state,
                        upstream_timeout,
                        config.host_address.as_deref(),
                    )
                    .await;
                    count(outcome, &mut published_total, &mut partial_total, &mut failed_total);
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Refresher shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        published_total,
                        partial_total,
                        failed_total,
                        manual_total,
                        "refresh stats"
                    );
                }
            }
        }
    })
}

fn count(outcome: RefreshOutcome, published: &mut u64, partial: &mut u64, failed: &mut u64) {
    match outcome {
        RefreshOutcome::Published => *published += 1,
        RefreshOutcome::PartiallyPublished => *partial += 1,
        RefreshOutcome::Failed => *failed += 1,
    }
}

async fn run_guarded(
    cache: &Arc<SnapshotCache>,
    metadata: &Arc<dyn MetadataSource>,
    runtime: &Arc<dyn RuntimeSource>,
    trigger_rx: &mut mpsc::Receiver<()>,
    state: &mut RefreshState,
    upstream_timeout: Duration,
    host_address: Option<&str>,
) -> RefreshOutcome {
    let _guard = cache.begin_refresh();
    let outcome = run_cycle(cache, metadata, runtime, state, upstream_timeout, host_address).await;
    // Triggers that arrived mid-refresh are satisfied by the cycle that just ran.
    while trigger_rx.try_recv().is_ok() {}
    outcome
}

async fn run_cycle(
    cache: &Arc<SnapshotCache>,
    metadata: &Arc<dyn MetadataSource>,
    runtime: &Arc<dyn RuntimeSource>,
    state: &mut RefreshState,
    upstream_timeout: Duration,
    host_address: Option<&str>,
) -> RefreshOutcome {
    let (inventory_result, network_result) = tokio::join!(
        bounded(upstream_timeout, metadata.fetch_inventory()),
        bounded(upstream_timeout, runtime.fetch_network()),
    );

    let metadata_ok = match inventory_result {
        Ok(inventory) => {
            state.inventory = Some(inventory);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "fetch_inventory", "metadata source failed");
            false
        }
    };
    let runtime_ok = match network_result {
        Ok(records) => {
            state.network = Some(records);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "fetch_network", "runtime source failed");
            false
        }
    };

    if !metadata_ok && !runtime_ok {
        // Nothing fresh on either side; keep the previous snapshot verbatim.
        return RefreshOutcome::Failed;
    }

    let empty = MetadataInventory::default();
    let inventory = state.inventory.as_ref().unwrap_or(&empty);
    let network = state.network.as_deref().unwrap_or(&[]);

    let entities = normalize(inventory, network)
        .into_iter()
        .map(|entry| resolve(entry, host_address))
        .collect();

    cache
        .publish(Snapshot {
            entities,
            generated_at: now_millis(),
            source_health: SourceHealth {
                metadata_ok,
                runtime_ok,
            },
            metrics: inventory.metrics.clone(),
        })
        .await;

    if metadata_ok && runtime_ok {
        RefreshOutcome::Published
    } else {
        RefreshOutcome::PartiallyPublished
    }
}

/// Bound one upstream call; past the budget it counts as failed for this
/// cycle and is not retried until the next one.
async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, UpstreamError>>,
) -> Result<T, UpstreamError> {
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Unavailable(format!(
            "timed out after {}s",
            limit.as_secs()
        ))),
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation = "get_timestamp",
                "system time error"
            );
            0
        })
}
