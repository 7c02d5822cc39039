//! Remote collaborators: the checkout API that owns the live cart, the
//! document store holding saved carts, and the user notification channel.
//!
//! This module is organized by collaborator:
//! - [`checkout`] - Order form mutations over HTTP
//! - [`master_data`] - Saved cart documents over HTTP
//! - [`notify`] - Error notification sinks
//!
//! The orchestrator only sees the traits defined here, so tests and other
//! transports can stand in for the HTTP clients.

mod checkout;
mod master_data;
mod notify;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Result;
use crate::auth::AppCredentials;
use crate::config::VtexConfig;
use crate::models::{
    AddItemsRequest, LiveSession, SaveSnapshotRequest, SetManualPriceRequest, SnapshotRecord,
    UpdatePaymentRequest,
};
use crate::query::SnapshotQuery;
use crate::tls::build_tls_config;

pub use checkout::HttpCheckoutClient;
pub use master_data::MasterDataClient;
pub use notify::{ChannelNotifier, Notifier, TracingNotifier};

/// Narrow, single-purpose mutations on a live order form.
///
/// Every call answers with the complete, authoritative order form.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Fetches the order form as it currently stands.
    async fn get_order_form(&self, order_form_id: &str) -> Result<LiveSession>;

    /// Removes every line. Clearing an empty cart succeeds.
    async fn clear_items(&self, order_form_id: &str) -> Result<LiveSession>;

    /// Adds a batch of lines.
    async fn add_items(&self, order_form_id: &str, request: &AddItemsRequest)
    -> Result<LiveSession>;

    /// Overrides the price of the line at `request.item_index`.
    async fn set_manual_price(
        &self,
        order_form_id: &str,
        request: SetManualPriceRequest,
    ) -> Result<LiveSession>;

    /// Replaces the selected payment.
    async fn update_payment(
        &self,
        order_form_id: &str,
        request: &UpdatePaymentRequest,
    ) -> Result<LiveSession>;
}

/// Storage for saved cart documents.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Returns every document matching `query`, in the query's sort order.
    async fn query_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<SnapshotRecord>>;

    /// Stores a new document and returns its id.
    async fn create_snapshot(&self, request: &SaveSnapshotRequest) -> Result<String>;
}

/// Connection details shared by the HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpContext {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<AppCredentials>,
}

impl HttpContext {
    /// Builds an HTTP client for the configured store.
    ///
    /// When a CA bundle is configured only its roots are trusted.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Tls`](crate::CartError::Tls) if the bundle cannot
    /// be loaded or the client cannot be built.
    pub fn from_config(config: &VtexConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(path) = &config.ca_bundle {
            builder = builder.use_preconfigured_tls(build_tls_config(path)?);
        }
        let client = builder
            .build()
            .map_err(|e| crate::CartError::Tls(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credentials: AppCredentials::from_parts(
                config.app_key.clone(),
                config.app_token.clone(),
            ),
        })
    }

    /// Wraps an existing client; used with local test servers.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, credentials: Option<AppCredentials>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        }
    }
}

/// Sends `request`, turning non-success statuses into
/// [`CartError::Api`](crate::CartError::Api) carrying the server's error
/// message.
async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "remote call rejected");
        return Err(crate::CartError::Api {
            status: status.as_u16(),
            message: error_message(&body)
                .unwrap_or_else(|| format!("request failed with status {status}")),
        });
    }

    Ok(response)
}

/// Sends `request` and decodes a JSON body.
async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    Ok(send(request).await?.json().await?)
}

/// Extracts a human-readable message from an error body.
///
/// Understands `{"error": {"message": ..}}`, `{"message": ..}` and
/// `{"Message": ..}`; otherwise returns the trimmed body text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let candidates = [
            &value["error"]["message"],
            &value["message"],
            &value["Message"],
        ];
        if let Some(message) = candidates.iter().find_map(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }

    Some(trimmed.to_string())
}
