//! App key / app token authentication for the store's REST APIs.
//!
//! Server-to-server calls authenticate with a pair of headers,
//! `X-VTEX-API-AppKey` and `X-VTEX-API-AppToken`. Without credentials the
//! client falls back to public storefront endpoints only.

use std::fmt;

use zeroize::Zeroizing;

/// Header carrying the app key.
pub const APP_KEY_HEADER: &str = "X-VTEX-API-AppKey";

/// Header carrying the app token.
pub const APP_TOKEN_HEADER: &str = "X-VTEX-API-AppToken";

/// An app token that is wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct AppToken(Zeroizing<String>);

impl AppToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Returns the raw token for placing it in a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AppToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppToken(***)")
    }
}

/// App key and token pair attached to every authenticated request.
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_key: String,
    pub app_token: AppToken,
}

impl AppCredentials {
    /// Pairs up optional config values; `None` unless both are present.
    #[must_use]
    pub fn from_parts(app_key: Option<String>, app_token: Option<AppToken>) -> Option<Self> {
        match (app_key, app_token) {
            (Some(app_key), Some(app_token)) => Some(Self { app_key, app_token }),
            _ => None,
        }
    }

    /// Adds the authentication headers to a request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(APP_KEY_HEADER, &self.app_key)
            .header(APP_TOKEN_HEADER, self.app_token.expose())
    }
}
