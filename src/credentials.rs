//! Catalog client credentials from the environment or the OS keyring.

use keyring::Entry;
use log::debug;

use crate::error::{Error, Result};

const CATALOG_SERVICE_NAME: &str = "mentune.catalog";

/// Environment variable that overrides the keyring-stored client secret.
pub const CLIENT_SECRET_ENV: &str = "MENTUNE_CLIENT_SECRET";

/// Client-credentials pair used to obtain catalog access tokens.
#[derive(Clone)]
pub struct CatalogCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for CatalogCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

const SECRET_SERVICE_MISSING: &str = "org.freedesktop.DBus.Error.ServiceUnknown";

/// Wraps a keyring failure, pointing at the environment variable when no
/// Secret Service provider is running.
fn keyring_failure(action: &str, client_id: &str, err: impl std::fmt::Display) -> Error {
    let detail = err.to_string();
    let mut message =
        format!("could not {action} the secret for client '{client_id}' in the system keyring: {detail}");
    if detail.contains(SECRET_SERVICE_MISSING) {
        message.push_str(&format!(
            " (no Secret Service provider is running; start one or set {CLIENT_SECRET_ENV})"
        ));
    }
    Error::credentials(message)
}

fn keyring_entry(client_id: &str) -> Result<Entry> {
    Entry::new(CATALOG_SERVICE_NAME, client_id)
        .map_err(|err| keyring_failure("open", client_id, err))
}

/// Saves the catalog client secret for `client_id` into the OS keyring.
pub fn set_client_secret(client_id: &str, secret: &str) -> Result<()> {
    keyring_entry(client_id)?
        .set_password(secret)
        .map_err(|err| keyring_failure("store", client_id, err))
}

/// Loads the catalog client secret for `client_id`; `None` when nothing is stored.
pub fn get_client_secret(client_id: &str) -> Result<Option<String>> {
    match keyring_entry(client_id)?.get_password() {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(keyring_failure("read", client_id, err)),
    }
}

/// Picks the secret from the environment value when set, else from `keyring_lookup`.
fn resolve_with<F>(
    client_id: &str,
    env_secret: Option<String>,
    keyring_lookup: F,
) -> Result<CatalogCredentials>
where
    F: FnOnce(&str) -> Result<Option<String>>,
{
    let client_id = client_id.trim();
    if client_id.is_empty() {
        return Err(Error::credentials(
            "catalog client_id is not configured; set [catalog].client_id in config.toml",
        ));
    }

    let env_secret = env_secret
        .map(|secret| secret.trim().to_string())
        .filter(|secret| !secret.is_empty());
    let client_secret = match env_secret {
        Some(secret) => {
            debug!("Using catalog client secret from {}", CLIENT_SECRET_ENV);
            secret
        }
        None => keyring_lookup(client_id)?.ok_or_else(|| {
            Error::credentials(format!(
                "no client secret for '{client_id}'; set {CLIENT_SECRET_ENV} or run with --store-secret"
            ))
        })?,
    };

    Ok(CatalogCredentials {
        client_id: client_id.to_string(),
        client_secret,
    })
}

/// Resolves credentials for `client_id`, preferring `MENTUNE_CLIENT_SECRET`
/// over the keyring.
pub fn resolve_credentials(client_id: &str) -> Result<CatalogCredentials> {
    resolve_with(
        client_id,
        std::env::var(CLIENT_SECRET_ENV).ok(),
        get_client_secret,
    )
}
