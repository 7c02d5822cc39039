//! Manual price override request.

use serde::Serialize;

/// Sets a manual price on the line at `item_index`.
///
/// Lines are addressed by position, so overrides must be sent one at a time
/// after the lines they target have been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetManualPriceRequest {
    pub item_index: usize,
    /// New unit price in cents.
    pub price: i64,
}

impl SetManualPriceRequest {
    #[must_use]
    pub fn new(item_index: usize, price: i64) -> Self {
        Self { item_index, price }
    }
}
