//! Wake address directory keyed by host.

use tracing::{info, warn};

use super::db::{Namespace, Store};
use crate::device::TvRemote;
use crate::error::{CoreError, StorageError};
use crate::types::{DeviceDescriptor, MacAddress};

/// Maps each TV host to the hardware address used to wake it.
pub struct DeviceDirectory<'a> {
    store: &'a Store,
}

impl<'a> DeviceDirectory<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Cached address for `host`.
    ///
    /// Rows are validated on write, so a row that no longer parses is a
    /// corrupted store and reported as such.
    pub fn get_mac(&self, host: &str) -> Result<Option<MacAddress>, CoreError> {
        match self.store.get(Namespace::Devices, host)? {
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                CoreError::Storage(StorageError::Unavailable {
                    path: self.store.path().display().to_string(),
                    message: format!("stored address for {} is malformed: {}", host, raw),
                })
            }),
            None => Ok(None),
        }
    }

    /// Validate and store `mac` for `host`, replacing any previous address.
    pub fn save_mac(&self, host: &str, mac: &str) -> Result<MacAddress, CoreError> {
        let parsed: MacAddress = mac.parse()?;
        self.store
            .upsert(Namespace::Devices, host, &parsed.to_string())?;
        info!(host, mac = %parsed, "wake address saved");
        Ok(parsed)
    }

    /// Store the address carried by a freshly fetched descriptor.
    pub fn save_from_descriptor(
        &self,
        host: &str,
        descriptor: &DeviceDescriptor,
    ) -> Result<MacAddress, CoreError> {
        let mac = descriptor
            .wifi_mac()
            .ok_or_else(|| CoreError::DeviceInfoUnavailable {
                host: host.to_string(),
                reason: "descriptor has no device.wifiMac field".to_string(),
            })?;
        self.save_mac(host, mac)
    }

    /// Return the cached address, fetching and caching it from the TV on
    /// first contact.
    ///
    /// A powered-off TV cannot answer the descriptor query, so the address
    /// must have been cached by an earlier session.
    pub async fn ensure_mac_known<R: TvRemote>(
        &self,
        host: &str,
        remote: &mut R,
    ) -> Result<MacAddress, CoreError> {
        if let Some(mac) = self.get_mac(host)? {
            return Ok(mac);
        }

        info!(host, "no cached wake address, fetching device descriptor");
        let descriptor = remote.device_descriptor().await.map_err(|e| {
            warn!(host, error = %e, "device descriptor fetch failed");
            CoreError::DeviceInfoUnavailable {
                host: host.to_string(),
                reason: e.to_string(),
            }
        })?;

        self.save_from_descriptor(host, &descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{setup_store, FakeRemote};

    #[test]
    fn test_save_mac_overwrites() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);

        directory.save_mac("tv", "11:11:11:11:11:11").unwrap();
        directory.save_mac("tv", "22:22:22:22:22:22").unwrap();

        assert_eq!(
            directory.get_mac("tv").unwrap().map(|m| m.to_string()).as_deref(),
            Some("22:22:22:22:22:22")
        );
    }

    #[test]
    fn test_save_mac_stores_canonical_form() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);

        directory.save_mac("tv", "70-2a-d5-01-b2-ff").unwrap();

        assert_eq!(
            store.get(Namespace::Devices, "tv").unwrap().as_deref(),
            Some("70:2A:D5:01:B2:FF")
        );
    }

    #[test]
    fn test_invalid_mac_keeps_previous_value() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);

        directory.save_mac("tv", "11:11:11:11:11:11").unwrap();
        let result = directory.save_mac("tv", "not-a-mac");

        assert!(matches!(result, Err(CoreError::InvalidAddress(_))));
        assert_eq!(
            directory.get_mac("tv").unwrap().map(|m| m.to_string()).as_deref(),
            Some("11:11:11:11:11:11")
        );
    }

    #[tokio::test]
    async fn test_ensure_mac_known_uses_cache() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);
        directory.save_mac("tv", "11:11:11:11:11:11").unwrap();

        let mut remote = FakeRemote::default();
        let mac = directory.ensure_mac_known("tv", &mut remote).await.unwrap();

        assert_eq!(mac.to_string(), "11:11:11:11:11:11");
        assert!(remote.calls.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_mac_known_fetches_and_caches() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);

        let mut remote = FakeRemote::with_mac("70:2A:D5:01:B2:FF");
        let mac = directory.ensure_mac_known("tv", &mut remote).await.unwrap();

        assert_eq!(mac.to_string(), "70:2A:D5:01:B2:FF");
        assert_eq!(remote.calls, vec!["device_descriptor".to_string()]);
        assert_eq!(directory.get_mac("tv").unwrap(), Some(mac));
    }

    #[tokio::test]
    async fn test_ensure_mac_known_unreachable() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);

        let mut remote = FakeRemote::unreachable();
        let result = directory.ensure_mac_known("tv", &mut remote).await;

        assert!(matches!(result, Err(CoreError::DeviceInfoUnavailable { .. })));
        assert_eq!(directory.get_mac("tv").unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_mac_known_descriptor_without_mac() {
        let (store, _tmp) = setup_store();
        let directory = DeviceDirectory::new(&store);

        let mut remote = FakeRemote::default();
        let result = directory.ensure_mac_known("tv", &mut remote).await;

        assert!(matches!(result, Err(CoreError::DeviceInfoUnavailable { .. })));
    }
}
