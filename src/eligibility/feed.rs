//! Change-feed plumbing for inventory views.
//!
//! The store announces that *something* changed in the inventory table; the watcher never
//! merges deltas, it re-reads the full bulk view on every notification and republishes it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::availability::InventoryWithDemand;
use super::repository::BloodBankStore;
use super::service::EligibilityService;

const DEFAULT_FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification payload. Receivers must treat it as a trigger only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryChange {
    pub kind: InventoryChangeKind,
    pub blood_type: Option<String>,
}

/// Broadcast channel carrying inventory change notifications.
#[derive(Debug, Clone)]
pub struct InventoryFeed {
    sender: broadcast::Sender<InventoryChange>,
}

impl Default for InventoryFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl InventoryFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryChange> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers were notified; zero is not an error.
    pub fn publish(&self, change: InventoryChange) -> usize {
        self.sender.send(change).unwrap_or(0)
    }
}

/// Latest recomputed bulk view. `generation` counts successful refreshes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySnapshot {
    pub generation: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub rows: Vec<InventoryWithDemand>,
}

/// Background task keeping an [`InventorySnapshot`] current.
pub struct InventoryWatcher {
    snapshot: watch::Receiver<InventorySnapshot>,
    handle: JoinHandle<()>,
}

impl InventoryWatcher {
    /// Subscribes before the initial refresh so no notification is lost. Must run inside a
    /// Tokio runtime.
    pub fn spawn<S>(service: Arc<EligibilityService<S>>, feed: &InventoryFeed) -> Self
    where
        S: BloodBankStore + 'static,
    {
        let mut changes = feed.subscribe();
        let (publisher, snapshot) = watch::channel(InventorySnapshot::default());

        let handle = tokio::spawn(async move {
            refresh(&service, &publisher);
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        debug!(?change.kind, blood_type = ?change.blood_type, "inventory changed");
                        refresh(&service, &publisher);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "inventory feed lagged, recomputing");
                        refresh(&service, &publisher);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            info!("inventory feed closed, watcher stopped");
        });

        Self { snapshot, handle }
    }

    pub fn latest(&self) -> InventorySnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InventorySnapshot> {
        self.snapshot.clone()
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

/// A failed read keeps the previous snapshot in place.
fn refresh<S>(service: &EligibilityService<S>, publisher: &watch::Sender<InventorySnapshot>)
where
    S: BloodBankStore + 'static,
{
    match service.blood_inventory_with_requests() {
        Ok(rows) => {
            publisher.send_modify(|snapshot| {
                snapshot.generation += 1;
                snapshot.refreshed_at = Some(Utc::now());
                snapshot.rows = rows;
            });
        }
        Err(error) => warn!(%error, "inventory refresh failed, keeping previous snapshot"),
    }
}
