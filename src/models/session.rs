//! The live order form a buyer is working in.
//!
//! Every checkout call answers with the full order form; callers replace
//! their local copy with it wholesale rather than patching fields.

use serde::{Deserialize, Serialize};

use super::{MarketingData, PaymentData};

/// The mutable cart currently open in the buyer's session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    pub order_form_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<SessionItem>,
    /// Grand total in cents.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub value: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub payment_data: PaymentData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_data: Option<MarketingData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_channel: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub totalizers: Vec<Totalizer>,
}

impl LiveSession {
    /// An empty order form with the given id.
    #[must_use]
    pub fn new(order_form_id: &str) -> Self {
        Self {
            order_form_id: order_form_id.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when some line was manually priced below its list price,
    /// i.e. the cart carries a negotiated quotation discount.
    #[must_use]
    pub fn has_quotation_discount(&self) -> bool {
        self.items.iter().any(|item| match item.manual_price {
            Some(manual) => manual < item.price.unwrap_or(0),
            None => false,
        })
    }

    /// Id of the selected payment system, if a payment is set.
    #[must_use]
    pub fn selected_payment_system(&self) -> Option<&str> {
        self.payment_data
            .selected()
            .map(|payment| payment.payment_system.as_str())
    }
}

/// A committed cart line. `unique_id` is assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    #[serde(deserialize_with = "super::id_format::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub unique_id: String,
    pub quantity: u32,
    pub seller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assemblies: Option<serde_json::Value>,
}

/// A line of the order form's totals breakdown (items, discounts, shipping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totalizer {
    pub id: String,
    pub name: String,
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Option<i64>, manual_price: Option<i64>) -> SessionItem {
        SessionItem {
            id: "1".to_string(),
            unique_id: "u1".to_string(),
            quantity: 1,
            seller: "1".to_string(),
            name: None,
            price,
            selling_price: price,
            manual_price,
            assemblies: None,
        }
    }

    #[test]
    fn quotation_discount_requires_manual_below_list() {
        let mut session = LiveSession::new("of-1");
        assert!(!session.has_quotation_discount());

        session.items = vec![item(Some(1000), None), item(Some(1000), Some(1000))];
        assert!(!session.has_quotation_discount());

        session.items.push(item(Some(1000), Some(900)));
        assert!(session.has_quotation_discount());
    }

    #[test]
    fn deserializes_order_form() {
        let json = r#"{
            "orderFormId": "abc123",
            "value": 2500,
            "salesChannel": "1",
            "items": [
                {"id": "10", "uniqueId": "X1", "quantity": 2, "seller": "1", "price": 1000, "sellingPrice": 1000},
                {"id": 11, "uniqueId": "X2", "quantity": 1, "seller": "1", "manualPrice": 500}
            ],
            "paymentData": {
                "payments": [{"paymentSystem": "2", "referenceValue": 2500, "value": 2500}],
                "paymentSystems": [{"id": 2, "name": "Boleto"}]
            },
            "totalizers": [{"id": "Items", "name": "Items Total", "value": 2500}],
            "clientProfileData": {"email": "buyer@example.com"}
        }"#;

        let session: LiveSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.order_form_id, "abc123");
        assert_eq!(session.items.len(), 2);
        assert_eq!(session.items[1].id, "11");
        assert_eq!(session.items[1].manual_price, Some(500));
        assert_eq!(session.selected_payment_system(), Some("2"));
        assert_eq!(session.totalizers[0].value, 2500);
        assert!(session.custom_data.is_none());
    }
}
