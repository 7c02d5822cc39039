//! Typed records for saved carts, the live order form, and the checkout
//! requests that rebuild one from the other.
//!
//! Wire names follow the store's camelCase JSON. Money is always an integer
//! amount of minor currency units (cents).

pub mod add_items;
pub mod line_item;
pub mod manual_price;
pub mod payment;
pub mod save;
pub mod session;
pub mod snapshot;

use std::collections::BTreeMap;

use serde::Deserialize;

pub use add_items::{AddItemEntry, AddItemsRequest, RESERVED_ATTRIBUTION_KEY};
pub use line_item::LineItem;
pub use manual_price::SetManualPriceRequest;
pub use payment::{
    Installment, InstallmentOption, MerchantSellerPayment, PaymentData, PaymentInput,
    PaymentSelection, PaymentSystem, UpdatePaymentRequest,
};
pub use save::SaveSnapshotRequest;
pub use session::{LiveSession, SessionItem, Totalizer};
pub use snapshot::{Snapshot, SnapshotPayload, SnapshotRecord, SnapshotScope, SnapshotSummary};

/// Free-form marketing attribution (utm parameters, coupons, ...).
pub type MarketingData = BTreeMap<String, serde_json::Value>;

/// Reads an explicit `null` as the type's default value.
///
/// Pair with `#[serde(default)]` so absent and null fields behave alike.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helpers for identifiers the store sends either as strings or numbers.
pub(crate) mod id_format {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    impl StringOrNumber {
        fn into_string(self) -> String {
            match self {
                Self::String(s) => s,
                Self::Int(n) => n.to_string(),
                Self::Float(n) => n.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<StringOrNumber>::deserialize(deserializer)
                .map(|v| v.map(StringOrNumber::into_string))
        }
    }
}
