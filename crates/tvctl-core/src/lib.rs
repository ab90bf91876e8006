//! Core library for tvctl.
//!
//! Holds the persistent local state (session tokens, app names, wake
//! addresses) and the dispatcher that resolves user input into calls on a
//! TV remote or a wake broadcast.

pub mod device;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use dispatch::{AppAction, Command, Dispatcher, Outcome};
pub use error::{CoreError, DeviceError, StorageError};
