//! Persistent local state: session tokens, app names and wake addresses.

pub mod apps;
pub mod credentials;
pub mod db;
pub mod devices;
pub mod tables;

pub use apps::AppRegistry;
pub use credentials::CredentialCache;
pub use db::{MatchMode, Namespace, Store};
pub use devices::DeviceDirectory;

/// File name of the store inside the data directory.
pub const STORE_FILE_NAME: &str = "tv-tokens.redb";

/// Get the default data directory for tvctl.
///
/// Uses the `directories` crate to find the appropriate platform-specific
/// data directory.
pub fn default_data_dir() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("", "tvctl", "tvctl").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default store location, falling back to the working directory.
pub fn default_store_path() -> std::path::PathBuf {
    default_data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(STORE_FILE_NAME)
}
