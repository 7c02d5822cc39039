//! Application configuration loaded from environment variables.
//!
//! - `VTEX_ACCOUNT` (required): store account name
//! - `VTEX_BASE_URL`: overrides the account-derived API host
//! - `VTEX_APP_KEY` / `VTEX_APP_TOKEN`: app credentials, both or neither
//! - `VTEX_CA_BUNDLE`: PEM file with pinned CA roots
//! - `SAVED_CARTS_ENTITY`: Master Data entity holding saved carts

use std::path::PathBuf;

use crate::auth::AppToken;

/// Master Data entity used when `SAVED_CARTS_ENTITY` is not set.
pub const DEFAULT_SAVED_CARTS_ENTITY: &str = "savedCarts";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub vtex: VtexConfig,
    pub saved_carts_entity: String,
}

/// Store connection settings.
#[derive(Debug)]
pub struct VtexConfig {
    pub account: String,
    pub base_url: String,
    pub app_key: Option<String>,
    pub app_token: Option<AppToken>,
    pub ca_bundle: Option<PathBuf>,
}

/// Loads the application configuration from environment variables.
///
/// The base URL defaults to `https://{account}.vtexcommercestable.com.br`.
/// App credentials are optional (storefront session mode) but when one is
/// set both must be present.
///
/// # Errors
///
/// Returns [`CartError::Config`](crate::CartError::Config) if `VTEX_ACCOUNT`
/// is missing or only one of the two credential variables is set.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let account = non_empty_var("VTEX_ACCOUNT")
        .ok_or_else(|| crate::CartError::Config("VTEX_ACCOUNT is not set".to_string()))?;

    let base_url = non_empty_var("VTEX_BASE_URL")
        .unwrap_or_else(|| default_base_url(&account))
        .trim_end_matches('/')
        .to_string();

    let app_key = non_empty_var("VTEX_APP_KEY");
    let app_token = non_empty_var("VTEX_APP_TOKEN");

    match (&app_key, &app_token) {
        (Some(_), None) => {
            return Err(crate::CartError::Config(
                "VTEX_APP_KEY is set but VTEX_APP_TOKEN is missing".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(crate::CartError::Config(
                "VTEX_APP_TOKEN is set but VTEX_APP_KEY is missing".to_string(),
            ));
        }
        _ => {}
    }

    Ok(AppConfig {
        vtex: VtexConfig {
            account,
            base_url,
            app_key,
            app_token: app_token.map(AppToken::new),
            ca_bundle: non_empty_var("VTEX_CA_BUNDLE").map(PathBuf::from),
        },
        saved_carts_entity: non_empty_var("SAVED_CARTS_ENTITY")
            .unwrap_or_else(|| DEFAULT_SAVED_CARTS_ENTITY.to_string()),
    })
}

fn default_base_url(account: &str) -> String {
    format!("https://{account}.vtexcommercestable.com.br")
}

/// Returns the value of an environment variable if it exists and is non-empty.
pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
