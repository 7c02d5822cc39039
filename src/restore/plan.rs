//! The calls needed to rebuild a snapshot, computed up front.

use super::reconcile::CarriedFields;
use crate::models::{
    AddItemsRequest, PaymentInput, SetManualPriceRequest, Snapshot, UpdatePaymentRequest,
};

/// Every remote request a restore will issue, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct RestorePlan {
    pub add_items: AddItemsRequest,
    /// Price overrides in snapshot order, addressed by snapshot position.
    pub manual_prices: Vec<SetManualPriceRequest>,
    pub payment: Option<UpdatePaymentRequest>,
    pub carry: CarriedFields,
}

impl RestorePlan {
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let payload = &snapshot.payload;

        let add_items = AddItemsRequest::from_line_items(&payload.items)
            .with_sales_channel(payload.sales_channel.as_deref())
            .with_marketing_data(payload.marketing_data.as_ref());

        let manual_prices = payload
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                item.manual_price
                    .map(|price| SetManualPriceRequest::new(index, price))
            })
            .collect();

        let payment = payload
            .payment_selection()
            .map(|selection| UpdatePaymentRequest::single(PaymentInput::from_selection(selection)));

        Self {
            add_items,
            manual_prices,
            payment,
            carry: CarriedFields::from_payload(payload),
        }
    }

    /// Number of remote calls the plan makes, clear included.
    #[must_use]
    pub fn call_count(&self) -> usize {
        2 + self.manual_prices.len() + usize::from(self.payment.is_some())
    }
}
