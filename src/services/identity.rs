// src/services/identity.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    models::user::Account,
    store::{DocumentStore, StoreError, collections, fetch, to_document},
    utils::hash::{hash_password, verify_password},
};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("an account with this email already exists")]
    AlreadyExists,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Account store behind signup and login.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates the credential and returns the new uid.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        email_verified: bool,
    ) -> Result<String, IdentityError>;

    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, IdentityError>;
}

/// Keeps Argon2 credentials in the 'accounts' collection, keyed by the
/// lower-cased email so a second signup for the same address collides.
#[derive(Clone)]
pub struct LocalIdentityProvider {
    store: Arc<dyn DocumentStore>,
}

impl LocalIdentityProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        email_verified: bool,
    ) -> Result<String, IdentityError> {
        let key = email.trim().to_lowercase();
        let account = Account {
            uid: uuid::Uuid::new_v4().to_string(),
            email: key.clone(),
            password_hash: hash_password(password)?,
            email_verified,
            created_at: Utc::now(),
        };

        match self
            .store
            .create(collections::ACCOUNTS, &key, to_document(&account)?)
            .await
        {
            Ok(()) => {
                tracing::info!("Account created for {} ({})", key, account.uid);
                Ok(account.uid)
            }
            Err(StoreError::AlreadyExists { .. }) => Err(IdentityError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, IdentityError> {
        let key = email.trim().to_lowercase();
        let account: Account = fetch(self.store.as_ref(), collections::ACCOUNTS, &key)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(account)
    }
}
