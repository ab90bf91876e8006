//! Error types for the tvctl CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use thiserror::Error;
use tvctl_core::error::CoreError;

// Re-export core error types so command modules can use them via crate::error
pub use tvctl_core::error::{DeviceError, StorageError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const DEVICE_ERROR: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Storage(_) => exit_codes::GENERAL_ERROR,
                CoreError::Device(DeviceError::Connect { .. })
                | CoreError::Device(DeviceError::Timeout { .. })
                | CoreError::Device(DeviceError::Wake { .. }) => exit_codes::NETWORK_ERROR,
                CoreError::Device(_) => exit_codes::DEVICE_ERROR,
                CoreError::DeviceInfoUnavailable { .. } => exit_codes::DEVICE_ERROR,
                CoreError::InvalidAddress(_) => exit_codes::DEVICE_ERROR,
                CoreError::MissingArgument { .. } => exit_codes::INVALID_ARGS,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
        }
    }
}

// Conversions from core error subtypes to CliError
impl From<DeviceError> for CliError {
    fn from(e: DeviceError) -> Self {
        CliError::Core(CoreError::Device(e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Core(CoreError::Storage(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
