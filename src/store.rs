//! Scoped access to saved carts.
//!
//! [`SnapshotStore`] turns raw documents into decoded [`Snapshot`]s and
//! guarantees the listing contract regardless of how faithfully the backing
//! store applied the filter: only snapshots owned by the scope, lineage
//! matched exactly, ordered by creation time.

use tracing::{debug, error, info};

use crate::Result;
use crate::api::SnapshotSource;
use crate::models::{SaveSnapshotRequest, Snapshot, SnapshotPayload, SnapshotScope};
use crate::query::SnapshotQuery;

/// Reads and writes saved carts through a [`SnapshotSource`].
pub struct SnapshotStore<S> {
    source: S,
}

impl<S: SnapshotSource> SnapshotStore<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Lists the snapshots visible in `scope`.
    ///
    /// Lineage listings (scope has a parent cart) are oldest first;
    /// top-level listings are newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Retrieval`](crate::CartError::Retrieval) if the
    /// source fails. No partial results are returned.
    pub async fn list(&self, scope: &SnapshotScope) -> Result<Vec<Snapshot>> {
        let query = SnapshotQuery::for_scope(scope);
        let records = self.source.query_snapshots(&query).await.map_err(|e| {
            error!(filter = %query.filter, error = %e, "Failed to list saved carts");
            crate::CartError::Retrieval(e.user_message())
        })?;

        let fetched = records.len();
        let mut snapshots: Vec<Snapshot> = records
            .into_iter()
            .map(Snapshot::from_record)
            .filter(|snapshot| scope.contains(snapshot))
            .collect();
        if snapshots.len() != fetched {
            debug!(
                fetched,
                kept = snapshots.len(),
                "Dropped saved carts outside the requested scope"
            );
        }

        if scope.parent_cart_id().is_some() {
            snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        } else {
            snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        info!(
            organization_id = scope.organization_id(),
            cost_center_id = scope.cost_center_id(),
            parent_cart_id = ?scope.parent_cart_id(),
            count = snapshots.len(),
            "Listed saved carts"
        );
        Ok(snapshots)
    }

    /// Finds the snapshot a user picked from a listing.
    #[must_use]
    pub fn find<'a>(snapshots: &'a [Snapshot], id: &str) -> Option<&'a Snapshot> {
        snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Saves `payload` as a new snapshot owned by `scope`, returning its id.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`](crate::CartError) if the payload cannot be
    /// encoded or the source rejects the write.
    pub async fn save(
        &self,
        title: &str,
        scope: &SnapshotScope,
        payload: &SnapshotPayload,
    ) -> Result<String> {
        let request = SaveSnapshotRequest::new(title, scope, payload)?;
        self.source.create_snapshot(&request).await
    }
}
