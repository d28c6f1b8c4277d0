//! Local account authentication.
//!
//! One account lives on the device. Registering again replaces it. Passwords
//! are kept as BLAKE3 digests, never in clear.

use crate::error::{Error, Result};
use crate::storage::Storage;
use async_trait::async_trait;
use refuge_core::Registration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_digest: String,
}

/// Authenticated identity handed back to the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl From<&AccountRecord> for Identity {
    fn from(account: &AccountRecord) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            token: format!("token-{}", account.id),
        }
    }
}

/// Something that can verify an e-mail / password pair.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity>;
}

/// Authenticator backed by the account record in local storage.
pub struct LocalAccounts {
    storage: Arc<Storage>,
}

impl LocalAccounts {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Validate the form and store it as the device account.
    pub fn register(&self, form: Registration) -> Result<Identity> {
        form.validate()?;

        let id = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::InvalidInput(e.to_string()))?
            .as_millis()
            .to_string();

        let account = AccountRecord {
            id,
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password_digest: digest(&form.password),
        };
        self.storage.put_account(&account)?;
        tracing::info!("Registered account {}", account.email);

        Ok(Identity::from(&account))
    }
}

#[async_trait]
impl Authenticator for LocalAccounts {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self
            .storage
            .get_account()?
            .ok_or_else(|| Error::AuthFailed("no account registered".into()))?;

        if account.email != email.trim() || account.password_digest != digest(password) {
            tracing::debug!("Login rejected for {}", email);
            return Err(Error::AuthFailed("credentials do not match".into()));
        }

        Ok(Identity::from(&account))
    }
}

fn digest(password: &str) -> String {
    hex::encode(blake3::hash(password.as_bytes()).as_bytes())
}
