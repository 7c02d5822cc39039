//! TLS configuration with pinned CA root certificates.
//!
//! Builds a [`rustls::ClientConfig`] that trusts only the roots found in a
//! PEM bundle, for deployments that route store traffic through an
//! inspecting proxy or want to pin the store's certificate authority.

use std::path::Path;

use rustls::ClientConfig;

use crate::Result;

/// Builds a [`ClientConfig`] whose root store contains only the CA
/// certificates from the PEM file at `pem_path`.
///
/// # Errors
///
/// Returns [`CartError::Tls`](crate::CartError::Tls) if the file cannot be
/// read, cannot be parsed, or contains no usable certificate.
pub fn build_tls_config(pem_path: &Path) -> Result<ClientConfig> {
    let pem = std::fs::read(pem_path).map_err(|e| {
        crate::CartError::Tls(format!("failed to read {}: {e}", pem_path.display()))
    })?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::CartError::Tls(format!("failed to parse CA PEM: {e}")))?;

    let mut root_store = rustls::RootCertStore::empty();
    let (added, _ignored) = root_store.add_parsable_certificates(certs);
    if added == 0 {
        return Err(crate::CartError::Tls(format!(
            "no CA certificates found in {}",
            pem_path.display()
        )));
    }

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}
