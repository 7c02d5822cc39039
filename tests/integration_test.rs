//! Live store integration tests.
//!
//! These tests talk to a real VTEX account configured through the usual
//! environment variables and require network access.
//! Run with: `cargo test --features integration-tests`
//!
//! `SAVED_CARTS_TEST_ORG` and `SAVED_CARTS_TEST_COST_CENTER` select the
//! scope to list.

#![cfg(feature = "integration-tests")]

use saved_carts::api::{HttpContext, MasterDataClient};
use saved_carts::config::fetch_config;
use saved_carts::models::SnapshotScope;
use saved_carts::store::SnapshotStore;

fn live_store() -> SnapshotStore<MasterDataClient> {
    let config = fetch_config().expect("VTEX_ACCOUNT must be set");
    let context = HttpContext::from_config(&config.vtex).expect("Failed to build HTTP client");
    SnapshotStore::new(MasterDataClient::new(context, &config.saved_carts_entity))
}

fn live_scope() -> SnapshotScope {
    let org = std::env::var("SAVED_CARTS_TEST_ORG").expect("SAVED_CARTS_TEST_ORG must be set");
    let cost_center = std::env::var("SAVED_CARTS_TEST_COST_CENTER")
        .expect("SAVED_CARTS_TEST_COST_CENTER must be set");
    SnapshotScope::new(&org, &cost_center, None).expect("Invalid test scope")
}

#[tokio::test]
async fn test_list_top_level_saved_carts() {
    let scope = live_scope();
    let snapshots = live_store()
        .list(&scope)
        .await
        .expect("Failed to list saved carts");

    for pair in snapshots.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    for snapshot in &snapshots {
        assert!(scope.contains(snapshot));
        assert!(snapshot.parent_cart_id.is_none());
    }
}

#[tokio::test]
async fn test_list_lineage_of_first_cart() {
    let scope = live_scope();
    let store = live_store();
    let top_level = store.list(&scope).await.expect("Failed to list saved carts");

    let Some(parent) = top_level.first() else {
        return;
    };
    let lineage = SnapshotScope::new(
        scope.organization_id(),
        scope.cost_center_id(),
        Some(&parent.id),
    )
    .expect("Invalid lineage scope");

    let children = store.list(&lineage).await.expect("Failed to list lineage");
    for pair in children.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
    for child in &children {
        assert_eq!(child.parent_cart_id.as_deref(), Some(parent.id.as_str()));
    }
}
