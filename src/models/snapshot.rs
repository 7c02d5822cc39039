//! Saved cart snapshots.
//!
//! A snapshot is stored as a Master Data document whose `data` field holds
//! the serialized cart. [`Snapshot::from_record`] decodes that blob exactly
//! once; every consumer downstream works with the typed [`SnapshotPayload`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{LineItem, LiveSession, MarketingData, PaymentData, PaymentSelection};

/// Identity a listing is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotScope {
    organization_id: String,
    cost_center_id: String,
    parent_cart_id: Option<String>,
}

impl SnapshotScope {
    /// Builds a scope, rejecting ids that cannot be quoted in a filter.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidScope`](crate::CartError::InvalidScope)
    /// if an id is empty or contains a single quote.
    pub fn new(
        organization_id: &str,
        cost_center_id: &str,
        parent_cart_id: Option<&str>,
    ) -> crate::Result<Self> {
        check_id("organizationId", organization_id)?;
        check_id("costCenterId", cost_center_id)?;
        if let Some(parent) = parent_cart_id {
            check_id("parentCartId", parent)?;
        }

        Ok(Self {
            organization_id: organization_id.to_string(),
            cost_center_id: cost_center_id.to_string(),
            parent_cart_id: parent_cart_id.map(str::to_string),
        })
    }

    #[must_use]
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    #[must_use]
    pub fn cost_center_id(&self) -> &str {
        &self.cost_center_id
    }

    #[must_use]
    pub fn parent_cart_id(&self) -> Option<&str> {
        self.parent_cart_id.as_deref()
    }

    /// Whether `snapshot` belongs to this scope, lineage included: with a
    /// parent the snapshot must reference it, without one it must reference
    /// none.
    #[must_use]
    pub fn contains(&self, snapshot: &Snapshot) -> bool {
        snapshot.organization_id == self.organization_id
            && snapshot.cost_center_id == self.cost_center_id
            && snapshot.parent_cart_id.as_deref() == self.parent_cart_id()
    }
}

fn check_id(field: &str, value: &str) -> crate::Result<()> {
    if value.is_empty() {
        return Err(crate::CartError::InvalidScope(format!("{field} is empty")));
    }
    if value.contains('\'') {
        return Err(crate::CartError::InvalidScope(format!(
            "{field} contains a quote: {value}"
        )));
    }
    Ok(())
}

/// A saved cart document as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub id: String,
    pub created_in: DateTime<Utc>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    pub organization_id: String,
    pub cost_center_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_cart_id: Option<String>,
    /// Serialized [`SnapshotPayload`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// The cart contents captured by a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_data: Option<MarketingData>,
    /// An unreadable payment block is dropped on its own; the lines survive.
    #[serde(
        default,
        deserialize_with = "lenient_payment_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_data: Option<PaymentData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<serde_json::Value>,
    /// Cart total in cents at save time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

fn lenient_payment_data<'de, D>(deserializer: D) -> Result<Option<PaymentData>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match serde_json::from_value(raw) {
        Ok(payment_data) => Ok(Some(payment_data)),
        Err(e) => {
            warn!(error = %e, "unreadable saved payment data, restoring without payment");
            Ok(None)
        }
    }
}

impl SnapshotPayload {
    /// Decodes a stored blob. Missing or unparseable data yields an empty
    /// payload: old snapshots may be partially corrupt and must still list.
    #[must_use]
    pub fn decode(snapshot_id: &str, raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(snapshot_id, error = %e, "unreadable saved cart payload, treating as empty");
                Self::default()
            }
        }
    }

    /// Serializes the payload for storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Json`](crate::CartError::Json) if serialization fails.
    pub fn encode(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Captures the current state of a live cart.
    #[must_use]
    pub fn from_session(session: &LiveSession) -> Self {
        let items = session
            .items
            .iter()
            .map(|item| LineItem {
                id: item.id.clone(),
                quantity: item.quantity,
                seller: item.seller.clone(),
                unique_id: Some(item.unique_id.clone()).filter(|id| !id.is_empty()),
                manual_price: item.manual_price,
                assemblies: item.assemblies.clone(),
                name: item.name.clone(),
                price: item.price,
                selling_price: item.selling_price,
            })
            .collect();

        Self {
            items,
            sales_channel: session.sales_channel.clone(),
            marketing_data: session.marketing_data.clone(),
            payment_data: Some(session.payment_data.clone()),
            custom_data: session.custom_data.clone(),
            value: Some(session.value),
        }
    }

    /// The payment that was selected when the cart was saved.
    #[must_use]
    pub fn payment_selection(&self) -> Option<&PaymentSelection> {
        self.payment_data.as_ref().and_then(PaymentData::selected)
    }
}

/// An immutable saved cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub organization_id: String,
    pub cost_center_id: String,
    pub parent_cart_id: Option<String>,
    pub payload: SnapshotPayload,
}

impl Snapshot {
    /// Converts a stored document, decoding its payload.
    #[must_use]
    pub fn from_record(record: SnapshotRecord) -> Self {
        let payload = SnapshotPayload::decode(&record.id, record.data.as_deref());

        Self {
            id: record.id,
            created_at: record.created_in,
            title: record.title,
            organization_id: record.organization_id,
            cost_center_id: record.cost_center_id,
            // Master Data returns absent lineage as null or as "".
            parent_cart_id: record.parent_cart_id.filter(|id| !id.is_empty()),
            payload,
        }
    }

    /// Figures shown next to a snapshot in a listing.
    #[must_use]
    pub fn summary(&self) -> SnapshotSummary {
        let payment_method = self.payload.payment_data.as_ref().and_then(|data| {
            let selected = data.selected()?;
            data.system(&selected.payment_system)
                .map(|system| system.name.clone())
        });

        SnapshotSummary {
            value: self.payload.value.filter(|value| *value > 0),
            item_count: self.payload.items.len(),
            payment_method,
        }
    }
}

/// Listing columns for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Total in cents; `None` when unknown or zero.
    pub value: Option<i64>,
    pub item_count: usize,
    /// Display name of the saved payment method.
    pub payment_method: Option<String>,
}
