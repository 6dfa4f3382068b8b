// Snapshot cache: one atomically-replaced Arc<Snapshot> plus a broadcast
// channel for push subscribers. Readers never wait on a refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{RwLock, broadcast, mpsc};

use crate::models::Snapshot;

pub struct SnapshotCache {
    current: RwLock<Arc<Snapshot>>,
    publish_tx: broadcast::Sender<Arc<Snapshot>>,
    refreshing: AtomicBool,
    trigger_tx: mpsc::Sender<()>,
}

impl SnapshotCache {
    /// Returns the cache and the trigger receiver the refresher drains.
    /// The trigger channel holds a single slot; that is what coalesces
    /// bursts of manual refresh requests.
    pub fn new(broadcast_capacity: usize) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (publish_tx, _) = broadcast::channel(broadcast_capacity);
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let cache = Arc::new(Self {
            current: RwLock::new(Arc::new(Snapshot::default())),
            publish_tx,
            refreshing: AtomicBool::new(false),
            trigger_tx,
        });
        (cache, trigger_rx)
    }

    /// Latest published snapshot. Before the first refresh completes this is
    /// `Snapshot::default()` with `generated_at == 0`.
    pub async fn current(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Replace the current snapshot and fan it out to subscribers.
    pub async fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = snapshot.clone();
        // No receivers is fine; WS clients come and go.
        let _ = self.publish_tx.send(snapshot);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Snapshot>> {
        self.publish_tx.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Relaxed)
    }

    /// Queue a manual refresh without blocking. Returns false when a refresh
    /// is already running or queued; the caller's request is then covered by
    /// that one.
    pub fn trigger_refresh(&self) -> bool {
        if self.is_refreshing() {
            return false;
        }
        self.trigger_tx.try_send(()).is_ok()
    }

    /// Marks a refresh in flight until the returned guard drops.
    pub(crate) fn begin_refresh(self: &Arc<Self>) -> RefreshGuard {
        self.refreshing.store(true, Ordering::Relaxed);
        RefreshGuard(self.clone())
    }
}

/// Clears the refreshing flag on drop (begin = set, drop = clear).
pub(crate) struct RefreshGuard(Arc<SnapshotCache>);

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.refreshing.store(false, Ordering::Relaxed);
    }
}
