//! Error types for tvctl core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Invalid hardware address: {0}")]
    InvalidAddress(String),

    #[error("Missing argument <{argument}> for command '{command}'")]
    MissingArgument { command: String, argument: String },

    #[error("Device info unavailable for {host}: {reason}")]
    DeviceInfoUnavailable { host: String, reason: String },
}

/// Persistent store errors.
///
/// Every variant is fatal for the invocation: the cache is required
/// infrastructure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store unavailable at {path}: {message}")]
    Unavailable { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
}

/// Transport errors from the TV remote or the wake sender.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Connection to {host} failed: {message}")]
    Connect { host: String, message: String },

    #[error("Pairing with {host} was rejected")]
    Unauthorized { host: String },

    #[error("Invalid response from {host}: {message}")]
    Protocol { host: String, message: String },

    #[error("HTTP request to {host} failed: {message}")]
    Http { host: String, message: String },

    #[error("Request to {host} timed out")]
    Timeout { host: String },

    #[error("Wake broadcast to {mac} failed: {message}")]
    Wake { mac: String, message: String },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_display() {
        let err = CoreError::MissingArgument {
            command: "open_web".to_string(),
            argument: "url".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Missing argument <url> for command 'open_web'"
        );
    }

    #[test]
    fn test_core_error_from_device_error() {
        let err = CoreError::from(DeviceError::Unauthorized {
            host: "10.0.0.5".to_string(),
        });
        assert!(format!("{}", err).contains("Pairing with 10.0.0.5 was rejected"));
    }

    #[test]
    fn test_storage_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CoreError::from(StorageError::from(io));
        assert!(matches!(err, CoreError::Storage(StorageError::Io(_))));
    }
}
