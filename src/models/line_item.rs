//! Line items as captured inside a saved cart.

use serde::{Deserialize, Serialize};

/// One line of a saved cart, in the order it was captured.
///
/// Only `id`, `quantity`, and `seller` are needed to re-add the line; the
/// display fields are kept so listings can show what was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// SKU identifier.
    #[serde(deserialize_with = "super::id_format::deserialize")]
    pub id: String,
    pub quantity: u32,
    pub seller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    /// Price set outside standard pricing, in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_price: Option<i64>,
    /// Assembly / configuration options attached to the line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assemblies: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<i64>,
}

impl LineItem {
    /// Creates a line with only the fields needed to add it to a cart.
    #[must_use]
    pub fn new(id: &str, quantity: u32, seller: &str) -> Self {
        Self {
            id: id.to_string(),
            quantity,
            seller: seller.to_string(),
            unique_id: None,
            manual_price: None,
            assemblies: None,
            name: None,
            price: None,
            selling_price: None,
        }
    }

    /// Sets the manual price override.
    #[must_use]
    pub fn with_manual_price(mut self, price: i64) -> Self {
        self.manual_price = Some(price);
        self
    }

    /// Sets the assembly options.
    #[must_use]
    pub fn with_assemblies(mut self, assemblies: serde_json::Value) -> Self {
        self.assemblies = Some(assemblies);
        self
    }

    /// Sets the unique id the line had in the cart it was saved from.
    #[must_use]
    pub fn with_unique_id(mut self, unique_id: &str) -> Self {
        self.unique_id = Some(unique_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_numeric_sku_and_optional_fields() {
        let json = r#"{
            "id": 1234,
            "quantity": 3,
            "seller": "1",
            "uniqueId": "A1B2",
            "manualPrice": 990,
            "assemblies": [{"id": "engraving", "inputValues": {"text": "hi"}}],
            "name": "Widget",
            "price": 1200,
            "sellingPrice": 1100
        }"#;

        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "1234");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.unique_id.as_deref(), Some("A1B2"));
        assert_eq!(item.manual_price, Some(990));
        assert!(item.assemblies.is_some());
        assert_eq!(item.selling_price, Some(1100));
    }

    #[test]
    fn minimal_item_serializes_without_optional_fields() {
        let item = LineItem::new("A", 2, "1");
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["id"], "A");
        assert_eq!(value["quantity"], 2);
        assert!(value.get("manualPrice").is_none());
        assert!(value.get("uniqueId").is_none());
    }
}
