//! Command implementations.

pub mod control;

pub use control::{print_usage, run_control};
