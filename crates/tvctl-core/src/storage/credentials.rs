//! Session token cache keyed by host.

use tracing::debug;

use super::db::{Namespace, Store};
use crate::error::StorageError;

/// Durable token slot per TV so pairing is not repeated every run.
///
/// Freshness and format are the remote's concern; this only persists.
pub struct CredentialCache<'a> {
    store: &'a Store,
}

impl<'a> CredentialCache<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get_token(&self, host: &str) -> Result<Option<String>, StorageError> {
        self.store.get(Namespace::Tokens, host)
    }

    pub fn save_token(&self, host: &str, token: &str) -> Result<(), StorageError> {
        debug!(host, "saving session token");
        self.store.upsert(Namespace::Tokens, host, token)
    }

    /// Return the cached token, creating an empty slot if none exists yet.
    pub fn open_slot(&self, host: &str) -> Result<String, StorageError> {
        match self.get_token(host)? {
            Some(token) => Ok(token),
            None => {
                self.save_token(host, "")?;
                Ok(String::new())
            }
        }
    }
}
