//! Order form mutations over the checkout REST API.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use super::{CheckoutApi, HttpContext, send_json};
use crate::Result;
use crate::models::{AddItemsRequest, LiveSession, SetManualPriceRequest, UpdatePaymentRequest};

/// [`CheckoutApi`] backed by `/api/checkout/pub/orderForm/{id}/...`.
#[derive(Debug, Clone)]
pub struct HttpCheckoutClient {
    context: HttpContext,
}

impl HttpCheckoutClient {
    #[must_use]
    pub fn new(context: HttpContext) -> Self {
        Self { context }
    }

    fn path(order_form_id: &str, suffix: &str) -> String {
        format!("/api/checkout/pub/orderForm/{order_form_id}{suffix}")
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutClient {
    async fn get_order_form(&self, order_form_id: &str) -> Result<LiveSession> {
        let request = self
            .context
            .request(Method::GET, &Self::path(order_form_id, ""));
        let session: LiveSession = send_json(request).await?;
        debug!(
            order_form_id,
            item_count = session.items.len(),
            "Fetched order form"
        );

        Ok(session)
    }

    async fn clear_items(&self, order_form_id: &str) -> Result<LiveSession> {
        let request = self
            .context
            .request(Method::POST, &Self::path(order_form_id, "/items/removeAll"))
            .json(&json!({}));
        let session = send_json(request).await?;
        info!(order_form_id, "Cleared order form items");

        Ok(session)
    }

    async fn add_items(
        &self,
        order_form_id: &str,
        request: &AddItemsRequest,
    ) -> Result<LiveSession> {
        let mut http = self
            .context
            .request(Method::POST, &Self::path(order_form_id, "/items"))
            .json(request);
        if let Some(sales_channel) = &request.sales_channel {
            http = http.query(&[("sc", sales_channel)]);
        }
        let session = send_json(http).await?;
        info!(
            order_form_id,
            item_count = request.item_count(),
            "Added items to order form"
        );

        Ok(session)
    }

    async fn set_manual_price(
        &self,
        order_form_id: &str,
        request: SetManualPriceRequest,
    ) -> Result<LiveSession> {
        let path = Self::path(
            order_form_id,
            &format!("/items/{}/price", request.item_index),
        );
        let http = self
            .context
            .request(Method::PUT, &path)
            .json(&json!({ "price": request.price }));
        let session = send_json(http).await?;
        info!(
            order_form_id,
            item_index = request.item_index,
            price = request.price,
            "Set manual price"
        );

        Ok(session)
    }

    async fn update_payment(
        &self,
        order_form_id: &str,
        request: &UpdatePaymentRequest,
    ) -> Result<LiveSession> {
        let http = self
            .context
            .request(
                Method::POST,
                &Self::path(order_form_id, "/attachments/paymentData"),
            )
            .json(request);
        let session = send_json(http).await?;
        info!(
            order_form_id,
            payment_count = request.payments.len(),
            "Updated order form payment"
        );

        Ok(session)
    }
}
