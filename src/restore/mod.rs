//! Rebuilding a saved cart inside the live order form.
//!
//! The checkout API has no "apply snapshot" call, so a restore is a strict
//! sequence of single-purpose calls, each starting from the order form the
//! previous one committed:
//!
//! 1. clear all lines
//! 2. add the saved lines as one batch, indexed by position
//! 3. apply manual prices one at a time, in snapshot order
//! 4. apply the saved payment, if there is one
//!
//! The first failing call ends the sequence. Nothing is rolled back: the
//! order form stays as the last successful call left it, and the failure is
//! reported once through the [`Notifier`].
//!
//! Clearing the cart and picking a payment method run under the same pending
//! flag and notification rules.

mod pending;
mod plan;
mod reconcile;

use std::fmt;

use tracing::{error, info, warn};

use crate::CartError;
use crate::api::{CheckoutApi, Notifier};
use crate::models::{LiveSession, PaymentInput, Snapshot, UpdatePaymentRequest};

pub use pending::{PendingFlag, PendingGuard};
pub use plan::RestorePlan;
pub use reconcile::CarriedFields;

/// A call in the restore sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStep {
    Clear,
    AddItems,
    ManualPrice { item_index: usize },
    Payment,
}

impl fmt::Display for RestoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "clear items"),
            Self::AddItems => write!(f, "add items"),
            Self::ManualPrice { item_index } => write!(f, "set manual price on item {item_index}"),
            Self::Payment => write!(f, "update payment"),
        }
    }
}

/// Session state threaded through a restore.
#[derive(Debug, Clone)]
pub struct RestoreContext {
    pub session: LiveSession,
    pub pending: PendingFlag,
    /// Whether the saved cart picker is showing.
    pub picker_open: bool,
}

/// Why a restore stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreFailure {
    pub step: RestoreStep,
    /// The remote error's message, as shown to the user.
    pub message: String,
    /// The order form as the last successful step left it.
    pub session: LiveSession,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    Restored(LiveSession),
    Failed(RestoreFailure),
}

/// Everything a restore hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreReport {
    pub outcome: RestoreOutcome,
    /// The snapshot that was selected for this restore.
    pub selected_snapshot: String,
    /// Closed after a successful restore, unchanged after a failure.
    pub picker_open: bool,
}

impl RestoreReport {
    /// The order form after the restore, complete or partial.
    #[must_use]
    pub fn session(&self) -> &LiveSession {
        match &self.outcome {
            RestoreOutcome::Restored(session) => session,
            RestoreOutcome::Failed(failure) => &failure.session,
        }
    }

    #[must_use]
    pub fn is_restored(&self) -> bool {
        matches!(self.outcome, RestoreOutcome::Restored(_))
    }
}

/// A failed call and the step it belongs to.
struct StepError {
    step: RestoreStep,
    source: CartError,
}

trait AtStep<T> {
    fn at(self, step: RestoreStep) -> Result<T, StepError>;
}

impl<T> AtStep<T> for crate::Result<T> {
    fn at(self, step: RestoreStep) -> Result<T, StepError> {
        self.map_err(|source| StepError { step, source })
    }
}

/// Drives restores and clears against one checkout API.
pub struct Restorer<C, N> {
    checkout: C,
    notifier: N,
}

impl<C: CheckoutApi, N: Notifier> Restorer<C, N> {
    #[must_use]
    pub fn new(checkout: C, notifier: N) -> Self {
        Self { checkout, notifier }
    }

    /// Rebuilds `snapshot` in `context.session`.
    ///
    /// The pending flag is raised for the whole run and cleared on every
    /// exit path. Errors never escape: a failure is notified once and
    /// returned as [`RestoreOutcome::Failed`].
    pub async fn restore(&self, snapshot: &Snapshot, context: RestoreContext) -> RestoreReport {
        let RestoreContext {
            session,
            pending,
            picker_open,
        } = context;
        let guard = pending.hold();

        let plan = RestorePlan::from_snapshot(snapshot);
        info!(
            snapshot_id = %snapshot.id,
            order_form_id = %session.order_form_id,
            item_count = plan.add_items.item_count(),
            price_overrides = plan.manual_prices.len(),
            has_payment = plan.payment.is_some(),
            "Restoring saved cart"
        );

        let mut working = session;
        let result = self.run(&plan, &mut working).await;
        drop(guard);

        match result {
            Ok(()) => {
                info!(
                    snapshot_id = %snapshot.id,
                    order_form_id = %working.order_form_id,
                    item_count = working.items.len(),
                    value = working.value,
                    "Restored saved cart"
                );
                RestoreReport {
                    outcome: RestoreOutcome::Restored(working),
                    selected_snapshot: snapshot.id.clone(),
                    picker_open: false,
                }
            }
            Err(StepError { step, source }) => {
                let failure = self.fail(step, &source, working);
                RestoreReport {
                    outcome: RestoreOutcome::Failed(failure),
                    selected_snapshot: snapshot.id.clone(),
                    picker_open,
                }
            }
        }
    }

    /// Removes every line from `session` under the pending flag.
    ///
    /// # Errors
    ///
    /// Returns the failure, with `session` unchanged, after notifying it.
    pub async fn clear_cart(
        &self,
        session: LiveSession,
        pending: &PendingFlag,
    ) -> Result<LiveSession, RestoreFailure> {
        let _guard = pending.hold();

        match self.checkout.clear_items(&session.order_form_id).await {
            Ok(cleared) => Ok(cleared),
            Err(source) => Err(self.fail(RestoreStep::Clear, &source, session)),
        }
    }

    /// Switches the order form to `payment_system`, paying with the first
    /// installment plan the store offers for it.
    ///
    /// Credit card systems, unknown systems, and systems without an
    /// installment plan cannot be picked; `session` comes back unchanged.
    ///
    /// # Errors
    ///
    /// Returns the failure, with `session` unchanged, after notifying it.
    pub async fn select_payment(
        &self,
        session: LiveSession,
        payment_system: &str,
        pending: &PendingFlag,
    ) -> Result<LiveSession, RestoreFailure> {
        let payment_data = &session.payment_data;
        let input = payment_data
            .selectable_systems()
            .any(|system| system.id == payment_system)
            .then(|| {
                PaymentInput::from_installment(payment_system, &payment_data.installment_options)
            })
            .flatten();
        let Some(input) = input else {
            warn!(
                order_form_id = %session.order_form_id,
                payment_system,
                "Payment system cannot be selected"
            );
            return Ok(session);
        };

        let _guard = pending.hold();
        let request = UpdatePaymentRequest::single(input);
        match self
            .checkout
            .update_payment(&session.order_form_id, &request)
            .await
        {
            Ok(updated) => {
                info!(
                    order_form_id = %updated.order_form_id,
                    payment_system,
                    value = updated.value,
                    "Selected payment"
                );
                Ok(updated)
            }
            Err(source) => Err(self.fail(RestoreStep::Payment, &source, session)),
        }
    }

    /// Falls back to the first selectable payment system when nothing valid
    /// is selected. A valid selection is left alone.
    ///
    /// # Errors
    ///
    /// Same as [`Restorer::select_payment`].
    pub async fn ensure_valid_payment(
        &self,
        session: LiveSession,
        pending: &PendingFlag,
    ) -> Result<LiveSession, RestoreFailure> {
        if session.payment_data.has_valid_selection() {
            return Ok(session);
        }
        let Some(first) = session
            .payment_data
            .selectable_systems()
            .next()
            .map(|system| system.id.clone())
        else {
            return Ok(session);
        };

        self.select_payment(session, &first, pending).await
    }

    async fn run(
        &self,
        plan: &RestorePlan,
        session: &mut LiveSession,
    ) -> Result<(), StepError> {
        let order_form_id = session.order_form_id.clone();

        *session = self
            .checkout
            .clear_items(&order_form_id)
            .await
            .at(RestoreStep::Clear)?;

        let added = self
            .checkout
            .add_items(&order_form_id, &plan.add_items)
            .await
            .at(RestoreStep::AddItems)?;
        *session = plan.carry.apply(added);

        // One at a time: overrides address lines by position.
        for request in &plan.manual_prices {
            let priced = self
                .checkout
                .set_manual_price(&order_form_id, *request)
                .await
                .at(RestoreStep::ManualPrice {
                    item_index: request.item_index,
                })?;
            *session = plan.carry.apply(priced);
        }

        if let Some(payment) = &plan.payment {
            *session = self
                .checkout
                .update_payment(&order_form_id, payment)
                .await
                .at(RestoreStep::Payment)?;
        }

        Ok(())
    }

    fn fail(&self, step: RestoreStep, source: &CartError, session: LiveSession) -> RestoreFailure {
        let message = source.user_message();
        error!(
            order_form_id = %session.order_form_id,
            %step,
            error = %source,
            "Saved cart step failed"
        );
        self.notifier.show_error(&message);

        RestoreFailure {
            step,
            message,
            session,
        }
    }
}
