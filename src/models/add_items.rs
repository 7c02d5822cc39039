//! Add-items request models.
//!
//! Lines are submitted as one batch. Each entry carries its position in the
//! saved cart (`index`) because later per-line calls address lines by
//! position: the server only assigns line identities after the batch commits.

use serde::Serialize;

use super::{LineItem, MarketingData};

/// Attribution key that only tracks the page a cart was built on. It is
/// never forwarded when items are re-added.
pub const RESERVED_ATTRIBUTION_KEY: &str = "utmipage";

/// One line of an add-items batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemEntry {
    pub id: String,
    pub index: usize,
    pub quantity: u32,
    pub seller: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

impl AddItemEntry {
    /// Builds the entry for the line at `index`.
    #[must_use]
    pub fn from_line_item(index: usize, item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            index,
            quantity: item.quantity,
            seller: item.seller.clone(),
            unique_id: item.unique_id.clone(),
            options: item.assemblies.clone(),
        }
    }
}

/// The add-items request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemsRequest {
    pub order_items: Vec<AddItemEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_data: Option<MarketingData>,
}

impl AddItemsRequest {
    /// Creates a request for `items`, indexing each by its position.
    #[must_use]
    pub fn from_line_items(items: &[LineItem]) -> Self {
        Self {
            order_items: items
                .iter()
                .enumerate()
                .map(|(index, item)| AddItemEntry::from_line_item(index, item))
                .collect(),
            sales_channel: None,
            marketing_data: None,
        }
    }

    /// Sets the sales channel (trade policy).
    #[must_use]
    pub fn with_sales_channel(mut self, sales_channel: Option<&str>) -> Self {
        self.sales_channel = sales_channel.map(str::to_string);
        self
    }

    /// Sets marketing attribution, dropping the reserved page-tracking key.
    #[must_use]
    pub fn with_marketing_data(mut self, marketing_data: Option<&MarketingData>) -> Self {
        self.marketing_data = marketing_data.map(|data| {
            data.iter()
                .filter(|(key, _)| !key.eq_ignore_ascii_case(RESERVED_ATTRIBUTION_KEY))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        });
        self
    }

    /// Returns the number of lines in the batch.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.order_items.len()
    }
}
