//! Carry-forward of snapshot fields the checkout API drops.
//!
//! Add-items and manual-price responses come back without the saved
//! cart's custom data and payment data. Until the payment step runs, the
//! working session must keep showing the snapshot's values, so those two
//! fields are re-applied to each of those responses.

use crate::models::{LiveSession, PaymentData, SnapshotPayload};

/// Snapshot fields re-applied to intermediate responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarriedFields {
    custom_data: Option<serde_json::Value>,
    payment_data: Option<PaymentData>,
}

impl CarriedFields {
    #[must_use]
    pub fn from_payload(payload: &SnapshotPayload) -> Self {
        Self {
            custom_data: payload.custom_data.clone(),
            payment_data: payload.payment_data.clone(),
        }
    }

    /// Overwrites the carried fields on `response`.
    ///
    /// A field the snapshot never captured leaves the response untouched.
    #[must_use]
    pub fn apply(&self, mut response: LiveSession) -> LiveSession {
        if let Some(custom_data) = &self.custom_data {
            response.custom_data = Some(custom_data.clone());
        }
        if let Some(payment_data) = &self.payment_data {
            response.payment_data = payment_data.clone();
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload_with_payment() -> SnapshotPayload {
        serde_json::from_value(json!({
            "items": [],
            "customData": {"customApps": [{"id": "b2b-quotes", "fields": {"quoteId": "Q1"}}]},
            "paymentData": {
                "payments": [{"paymentSystem": "2", "referenceValue": 1000}],
                "paymentSystems": [{"id": 2, "name": "Boleto"}]
            }
        }))
        .unwrap()
    }

    #[test]
    fn snapshot_fields_replace_response_fields() {
        let carry = CarriedFields::from_payload(&payload_with_payment());

        let mut response = LiveSession::new("of-1");
        response.value = 4200;
        response.custom_data = Some(json!({"customApps": []}));

        let merged = carry.apply(response);
        assert_eq!(merged.value, 4200);
        assert_eq!(merged.selected_payment_system(), Some("2"));
        assert_eq!(
            merged.custom_data.unwrap()["customApps"][0]["id"],
            "b2b-quotes"
        );
    }

    #[test]
    fn absent_snapshot_fields_keep_response() {
        let carry = CarriedFields::from_payload(&SnapshotPayload::default());

        let mut response = LiveSession::new("of-1");
        response.custom_data = Some(json!({"k": "v"}));
        let before = response.clone();

        assert_eq!(carry.apply(response), before);
    }
}
