use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;

use super::common::*;
use crate::eligibility::{
    EligibilityPolicy, EligibilityService, InventoryChange, InventoryChangeKind, InventoryFeed,
    InventorySnapshot, InventoryWatcher,
};

async fn wait_until(
    updates: &mut watch::Receiver<InventorySnapshot>,
    predicate: impl FnMut(&InventorySnapshot) -> bool,
) -> InventorySnapshot {
    timeout(Duration::from_secs(5), updates.wait_for(predicate))
        .await
        .expect("snapshot updated in time")
        .expect("watcher alive")
        .clone()
}

fn change(kind: InventoryChangeKind, blood_type: &str) -> InventoryChange {
    InventoryChange {
        kind,
        blood_type: Some(blood_type.to_string()),
    }
}

#[tokio::test]
async fn initial_snapshot_is_computed_on_spawn() {
    let store = MemoryStore::default().with_inventory([inventory("A-", 12, 60)]);
    let feed = InventoryFeed::default();
    let watcher = InventoryWatcher::spawn(Arc::new(build_service(store)), &feed);

    let mut updates = watcher.subscribe();
    let snapshot = wait_until(&mut updates, |snapshot| snapshot.generation >= 1).await;
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0].blood_type, "A-");
    assert!(snapshot.refreshed_at.is_some());

    watcher.shutdown();
}

#[tokio::test]
async fn change_notifications_trigger_a_full_recompute() {
    let store = MemoryStore::default().with_inventory([inventory("O-", 40, 100)]);
    let feed = InventoryFeed::default();
    let watcher = InventoryWatcher::spawn(Arc::new(build_service(store.clone())), &feed);
    let mut updates = watcher.subscribe();
    wait_until(&mut updates, |snapshot| snapshot.generation >= 1).await;

    store.set_inventory(inventory("O-", 5, 100));
    store.set_inventory(inventory("B+", 70, 100));
    assert_eq!(feed.publish(change(InventoryChangeKind::Update, "O-")), 1);

    let snapshot = wait_until(&mut updates, |snapshot| snapshot.generation >= 2).await;
    let labels: Vec<&str> = snapshot
        .rows
        .iter()
        .map(|row| row.blood_type.as_str())
        .collect();
    assert_eq!(labels, vec!["B+", "O-"]);
    assert_eq!(snapshot.rows[1].quantity, 5);
    assert_eq!(watcher.latest().rows, snapshot.rows);

    watcher.shutdown();
}

#[tokio::test]
async fn lagged_watcher_still_converges_on_latest_state() {
    let store = MemoryStore::default();
    let feed = InventoryFeed::new(1);
    let watcher = InventoryWatcher::spawn(Arc::new(build_service(store.clone())), &feed);
    let mut updates = watcher.subscribe();

    for quantity in 1..=10 {
        store.set_inventory(inventory("AB+", quantity, 100));
    }
    for _ in 0..10 {
        feed.publish(change(InventoryChangeKind::Update, "AB+"));
    }

    let snapshot = wait_until(&mut updates, |snapshot| {
        snapshot
            .rows
            .first()
            .is_some_and(|row| row.quantity == 10)
    })
    .await;
    assert_eq!(snapshot.rows.len(), 1);

    watcher.shutdown();
}

#[tokio::test]
async fn closing_the_feed_stops_the_watcher() {
    let feed = InventoryFeed::default();
    let watcher = InventoryWatcher::spawn(Arc::new(build_service(MemoryStore::default())), &feed);
    let mut updates = watcher.subscribe();
    drop(feed);

    let stopped = timeout(Duration::from_secs(5), updates.wait_for(|_| false))
        .await
        .expect("watcher observed the closed feed");
    assert!(stopped.is_err());
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_snapshot() {
    let feed = InventoryFeed::default();
    let service = Arc::new(EligibilityService::new(
        Arc::new(UnavailableStore),
        EligibilityPolicy::default(),
    ));
    let watcher = InventoryWatcher::spawn(service, &feed);

    feed.publish(change(InventoryChangeKind::Delete, "A+"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(watcher.latest(), InventorySnapshot::default());
    watcher.shutdown();
}

#[test]
fn publishing_without_subscribers_is_not_an_error() {
    let feed = InventoryFeed::default();
    assert_eq!(feed.publish(change(InventoryChangeKind::Insert, "O+")), 0);
}
