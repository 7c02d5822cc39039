//! Save-cart request: the write path that creates a new snapshot document.

use serde::Serialize;

use super::{SnapshotPayload, SnapshotScope};

/// A new saved cart document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshotRequest {
    pub title: String,
    pub organization_id: String,
    pub cost_center_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_cart_id: Option<String>,
    /// Serialized payload, written once.
    pub data: String,
}

impl SaveSnapshotRequest {
    /// Builds a save request owned by `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Json`](crate::CartError::Json) if the payload
    /// cannot be serialized.
    pub fn new(title: &str, scope: &SnapshotScope, payload: &SnapshotPayload) -> crate::Result<Self> {
        Ok(Self {
            title: title.to_string(),
            organization_id: scope.organization_id().to_string(),
            cost_center_id: scope.cost_center_id().to_string(),
            parent_cart_id: scope.parent_cart_id().map(str::to_string),
            data: payload.encode()?,
        })
    }
}
