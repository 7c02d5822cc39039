//! Payment models: the order form's payment data and the update-payment
//! request.
//!
//! The same [`PaymentData`] shape appears in the live order form and inside a
//! saved cart's payload, so a saved selection can be replayed as-is.

use serde::{Deserialize, Serialize};

/// Payment group that is never offered for manual selection.
pub const CREDIT_CARD_GROUP: &str = "creditCardPaymentGroup";

/// Payment state of an order form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub payments: Vec<PaymentSelection>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub payment_systems: Vec<PaymentSystem>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub installment_options: Vec<InstallmentOption>,
}

impl PaymentData {
    /// The currently selected payment, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&PaymentSelection> {
        self.payments.first()
    }

    /// Payment systems a buyer may pick by hand (credit cards excluded).
    pub fn selectable_systems(&self) -> impl Iterator<Item = &PaymentSystem> {
        self.payment_systems
            .iter()
            .filter(|system| system.group_name.as_deref() != Some(CREDIT_CARD_GROUP))
    }

    /// Whether the selected payment is one a buyer may pick by hand.
    #[must_use]
    pub fn has_valid_selection(&self) -> bool {
        self.selected().is_some_and(|selected| {
            self.selectable_systems()
                .any(|system| system.id == selected.payment_system)
        })
    }

    /// Looks up a payment system by id.
    #[must_use]
    pub fn system(&self, id: &str) -> Option<&PaymentSystem> {
        self.payment_systems.iter().find(|system| system.id == id)
    }
}

/// A chosen payment: system, amounts, and installment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSelection {
    #[serde(deserialize_with = "super::id_format::deserialize")]
    pub payment_system: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub reference_value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(
        default,
        alias = "installment",
        skip_serializing_if = "Option::is_none"
    )]
    pub installments: Option<u32>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub merchant_seller_payments: Vec<MerchantSellerPayment>,
}

/// Per-seller breakdown of a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSellerPayment {
    #[serde(
        default,
        deserialize_with = "super::id_format::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

/// A payment method offered by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSystem {
    #[serde(deserialize_with = "super::id_format::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

/// Installment plans available for one payment system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentOption {
    #[serde(deserialize_with = "super::id_format::deserialize")]
    pub payment_system: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub installments: Vec<Installment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub count: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub interest_rate: f64,
    pub value: i64,
    pub total: i64,
}

/// One entry of an update-payment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub payment_system: String,
    pub reference_value: i64,
    pub installments_interest_rate: f64,
    pub installments: u32,
    pub value: i64,
}

impl PaymentInput {
    /// Replays a saved payment selection.
    ///
    /// Interest rate comes from the first merchant-seller record (default 0).
    /// Installments come from the selection, then that record (default 1).
    /// A selection without a value pays its reference value.
    #[must_use]
    pub fn from_selection(selection: &PaymentSelection) -> Self {
        let first_sub = selection.merchant_seller_payments.first();

        Self {
            payment_system: selection.payment_system.clone(),
            reference_value: selection.reference_value,
            installments_interest_rate: first_sub
                .and_then(|sub| sub.interest_rate)
                .unwrap_or(0.0),
            installments: selection
                .installments
                .or_else(|| first_sub.and_then(|sub| sub.installments))
                .unwrap_or(1),
            value: selection.value.unwrap_or(selection.reference_value),
        }
    }

    /// Selects `payment_system` using its first offered installment plan.
    ///
    /// Returns `None` when the store offers no installment for that system.
    #[must_use]
    pub fn from_installment(payment_system: &str, options: &[InstallmentOption]) -> Option<Self> {
        let installment = options
            .iter()
            .find(|option| option.payment_system == payment_system)?
            .installments
            .first()?;

        Some(Self {
            payment_system: payment_system.to_string(),
            reference_value: installment.value,
            installments_interest_rate: installment.interest_rate,
            installments: installment.count,
            value: installment.total,
        })
    }
}

/// Body of the update-payment call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePaymentRequest {
    pub payments: Vec<PaymentInput>,
}

impl UpdatePaymentRequest {
    #[must_use]
    pub fn single(payment: PaymentInput) -> Self {
        Self {
            payments: vec![payment],
        }
    }
}
