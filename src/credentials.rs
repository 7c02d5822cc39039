//! Secure credential storage via the system keychain.
//!
//! Provides functions to load, save, and check app credentials stored in
//! the system keychain. At startup, [`populate_env_from_keychain`]
//! copies any stored credentials into environment variables so the
//! existing config flow picks them up transparently.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::non_empty_var;

/// Keychain service name used for all stored credentials.
const SERVICE: &str = "saved-carts";

/// Known credential keys managed by this module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialKey {
    AppKey,
    AppToken,
}

impl CredentialKey {
    /// Returns the keychain entry identifier.
    pub fn keyring_id(self) -> &'static str {
        match self {
            Self::AppKey => "vtex_app_key",
            Self::AppToken => "vtex_app_token",
        }
    }

    /// Returns the environment variable name for this credential.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::AppKey => "VTEX_APP_KEY",
            Self::AppToken => "VTEX_APP_TOKEN",
        }
    }

    /// All credential keys.
    pub const ALL: [CredentialKey; 2] = [Self::AppKey, Self::AppToken];
}

/// Loads a credential from the keychain, returning `None` if not set.
pub fn load(key: CredentialKey) -> Option<Zeroizing<String>> {
    let entry = keyring::Entry::new(SERVICE, key.keyring_id()).ok()?;
    match entry.get_password() {
        Ok(password) => Some(Zeroizing::new(password)),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            warn!(key = key.keyring_id(), error = %e, "failed to read keychain entry");
            None
        }
    }
}

/// Saves a credential to the keychain.
pub fn save(key: CredentialKey, value: &str) -> crate::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.keyring_id())
        .map_err(|e| crate::CartError::Config(format!("keyring entry error: {e}")))?;
    entry
        .set_password(value)
        .map_err(|e| crate::CartError::Config(format!("failed to save to keychain: {e}")))
}

/// Checks whether a credential exists in the keychain.
pub fn is_set(key: CredentialKey) -> bool {
    load(key).is_some()
}

/// Populates environment variables from the keychain for any
/// credentials not already set in the environment.
///
/// A variable set to the empty string counts as missing, the same rule
/// [`crate::config::fetch_config`] applies.
///
/// Call this at startup before [`crate::config::fetch_config`] and before
/// any async runtime or other thread exists.
pub fn populate_env_from_keychain() {
    for key in CredentialKey::ALL {
        if missing_from_env(key.env_var())
            && let Some(value) = load(key)
        {
            debug!(key = key.env_var(), "loaded credential from keychain");
            // SAFETY: called from `main` before the tokio runtime is built,
            // so no other thread can read the environment concurrently.
            unsafe {
                std::env::set_var(key.env_var(), value.as_str());
            }
        }
    }
}

fn missing_from_env(name: &str) -> bool {
    non_empty_var(name).is_none()
}
