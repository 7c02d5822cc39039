//! Shared test doubles: an in-memory checkout, snapshot source, and notifier.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use saved_carts::api::{CheckoutApi, Notifier, SnapshotSource};
use saved_carts::models::{
    AddItemsRequest, LiveSession, PaymentData, PaymentSelection, SaveSnapshotRequest,
    SessionItem, SetManualPriceRequest, SnapshotRecord, UpdatePaymentRequest,
};
use saved_carts::query::SnapshotQuery;
use saved_carts::restore::PendingFlag;
use saved_carts::{CartError, Result};

/// List price the fake checkout assigns to every added line.
pub const LIST_PRICE: i64 = 1000;

/// A call received by [`RecordingCheckout`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get,
    Clear,
    AddItems(AddItemsRequest),
    ManualPrice(SetManualPriceRequest),
    Payment(UpdatePaymentRequest),
}

/// Which call the fake checkout should reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Get,
    Clear,
    AddItems,
    ManualPrice { item_index: usize },
    Payment,
}

#[derive(Default)]
struct CheckoutState {
    calls: Vec<Call>,
    session: LiveSession,
    fail_at: Option<FailAt>,
    pending: Option<PendingFlag>,
    pending_seen: Vec<bool>,
    next_unique_id: u32,
}

/// In-memory checkout that records calls and behaves like the real one:
/// every response is the full order form, and responses never carry the
/// custom data or payment data of earlier calls except after `update_payment`.
#[derive(Clone, Default)]
pub struct RecordingCheckout {
    state: Arc<Mutex<CheckoutState>>,
}

impl RecordingCheckout {
    pub fn new(session: LiveSession) -> Self {
        let checkout = Self::default();
        checkout.state.lock().unwrap().session = session;
        checkout
    }

    pub fn failing_at(self, fail_at: FailAt) -> Self {
        self.state.lock().unwrap().fail_at = Some(fail_at);
        self
    }

    /// Records the pending flag's value at every call.
    pub fn observing(self, pending: &PendingFlag) -> Self {
        self.state.lock().unwrap().pending = Some(pending.clone());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn pending_seen(&self) -> Vec<bool> {
        self.state.lock().unwrap().pending_seen.clone()
    }

    fn enter(&self, call: Call, kind: FailAt) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let pending = state.pending.as_ref().map(PendingFlag::is_pending);
        if let Some(pending) = pending {
            state.pending_seen.push(pending);
        }
        state.calls.push(call);

        if state.fail_at == Some(kind) {
            return Err(CartError::Api {
                status: 400,
                message: format!("rejected {kind:?}"),
            });
        }
        Ok(())
    }

    fn respond(&self, mutate: impl FnOnce(&mut LiveSession)) -> LiveSession {
        let mut state = self.state.lock().unwrap();
        mutate(&mut state.session);
        recompute_value(&mut state.session);

        let mut response = state.session.clone();
        response.custom_data = None;
        response
    }
}

fn recompute_value(session: &mut LiveSession) {
    session.value = session
        .items
        .iter()
        .map(|item| item.manual_price.or(item.price).unwrap_or(0) * i64::from(item.quantity))
        .sum();
}

#[async_trait]
impl CheckoutApi for RecordingCheckout {
    async fn get_order_form(&self, _order_form_id: &str) -> Result<LiveSession> {
        self.enter(Call::Get, FailAt::Get)?;
        Ok(self.state.lock().unwrap().session.clone())
    }

    async fn clear_items(&self, _order_form_id: &str) -> Result<LiveSession> {
        self.enter(Call::Clear, FailAt::Clear)?;
        Ok(self.respond(|session| {
            session.items.clear();
            session.payment_data = PaymentData::default();
        }))
    }

    async fn add_items(
        &self,
        _order_form_id: &str,
        request: &AddItemsRequest,
    ) -> Result<LiveSession> {
        self.enter(Call::AddItems(request.clone()), FailAt::AddItems)?;

        let first_id = {
            let mut state = self.state.lock().unwrap();
            let first = state.next_unique_id;
            state.next_unique_id += request.order_items.len() as u32;
            first
        };

        Ok(self.respond(|session| {
            for (offset, entry) in request.order_items.iter().enumerate() {
                session.items.push(SessionItem {
                    id: entry.id.clone(),
                    unique_id: format!("U{}", first_id as usize + offset),
                    quantity: entry.quantity,
                    seller: entry.seller.clone(),
                    name: None,
                    price: Some(LIST_PRICE),
                    selling_price: Some(LIST_PRICE),
                    manual_price: None,
                    assemblies: entry.options.clone(),
                });
            }
            session.sales_channel = request.sales_channel.clone();
            session.marketing_data = request.marketing_data.clone();
            session.payment_data = PaymentData::default();
        }))
    }

    async fn set_manual_price(
        &self,
        _order_form_id: &str,
        request: SetManualPriceRequest,
    ) -> Result<LiveSession> {
        self.enter(
            Call::ManualPrice(request),
            FailAt::ManualPrice {
                item_index: request.item_index,
            },
        )?;

        let mut state = self.state.lock().unwrap();
        let Some(item) = state.session.items.get_mut(request.item_index) else {
            return Err(CartError::Api {
                status: 400,
                message: format!("no item at index {}", request.item_index),
            });
        };
        item.manual_price = Some(request.price);
        drop(state);

        Ok(self.respond(|session| session.payment_data = PaymentData::default()))
    }

    async fn update_payment(
        &self,
        _order_form_id: &str,
        request: &UpdatePaymentRequest,
    ) -> Result<LiveSession> {
        self.enter(Call::Payment(request.clone()), FailAt::Payment)?;

        Ok(self.respond(|session| {
            session.payment_data.payments = request
                .payments
                .iter()
                .map(|input| PaymentSelection {
                    payment_system: input.payment_system.clone(),
                    reference_value: input.reference_value,
                    value: Some(input.value),
                    installments: Some(input.installments),
                    merchant_seller_payments: Vec::new(),
                })
                .collect();
        }))
    }
}

/// Notifier that keeps every message.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Snapshot source returning a fixed set of documents, unfiltered.
#[derive(Clone, Default)]
pub struct InMemorySource {
    records: Vec<SnapshotRecord>,
    fail: bool,
    queries: Arc<Mutex<Vec<SnapshotQuery>>>,
    created: Arc<Mutex<Vec<SaveSnapshotRequest>>>,
}

impl InMemorySource {
    pub fn new(records: Vec<SnapshotRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<SnapshotQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<SaveSnapshotRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotSource for InMemorySource {
    async fn query_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<SnapshotRecord>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(CartError::Api {
                status: 503,
                message: "Master Data unavailable".to_string(),
            });
        }
        Ok(self.records.clone())
    }

    async fn create_snapshot(&self, request: &SaveSnapshotRequest) -> Result<String> {
        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        Ok(format!("doc-{}", created.len()))
    }
}

/// A stored document with the given ownership and creation time.
pub fn record(
    id: &str,
    org: &str,
    cost_center: &str,
    parent: Option<&str>,
    created_in: &str,
) -> SnapshotRecord {
    SnapshotRecord {
        id: id.to_string(),
        created_in: created_in.parse::<DateTime<Utc>>().unwrap(),
        title: format!("cart {id}"),
        organization_id: org.to_string(),
        cost_center_id: cost_center.to_string(),
        parent_cart_id: parent.map(str::to_string),
        data: Some(r#"{"items": []}"#.to_string()),
    }
}
