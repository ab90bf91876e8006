//! Protocol layer for TV communication.
//!
//! This module builds remote-control messages and parses the TV's replies.

pub mod commands;
pub mod response;
