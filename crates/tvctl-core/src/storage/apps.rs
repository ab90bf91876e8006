//! Installed-app name registry.

use tracing::{debug, info};

use super::db::{Namespace, Store};
use crate::error::StorageError;
use crate::types::AppInfo;

/// Cached app id -> name pairs, refreshed on every app enumeration.
pub struct AppRegistry<'a> {
    store: &'a Store,
}

impl<'a> AppRegistry<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Upsert every enumerated app in a single commit.
    pub fn record_apps(&self, apps: &[AppInfo]) -> Result<(), StorageError> {
        self.store.upsert_many(
            Namespace::Apps,
            apps.iter().map(|app| (app.app_id.as_str(), app.name.as_str())),
        )?;
        info!(count = apps.len(), "app registry updated");
        Ok(())
    }

    /// Resolve a full or partial app name to its id.
    ///
    /// `None` covers both "not installed" and "not enumerated yet".
    pub fn resolve(&self, query: &str) -> Result<Option<String>, StorageError> {
        let app_id = self.store.find_by_partial(Namespace::Apps, query)?;
        debug!(query, app_id = ?app_id, "resolved app name");
        Ok(app_id)
    }

    /// Every cached app whose name matches `query`, ordered by app id.
    ///
    /// `resolve` picks the first of these.
    pub fn candidates(&self, query: &str) -> Result<Vec<AppInfo>, StorageError> {
        let match_mode = self.store.match_mode();
        Ok(self
            .list()?
            .into_iter()
            .filter(|app| match_mode.contains(&app.name, query))
            .collect())
    }

    /// All cached mappings, ordered by app id.
    pub fn list(&self) -> Result<Vec<AppInfo>, StorageError> {
        Ok(self
            .store
            .entries(Namespace::Apps)?
            .into_iter()
            .map(|(app_id, name)| AppInfo::new(app_id, name))
            .collect())
    }
}
