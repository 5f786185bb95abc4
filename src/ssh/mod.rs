// ABOUTME: SSH client module for remote server connections.
// ABOUTME: Key-based authentication with intentionally relaxed host-key checks.

mod client;
mod error;

pub use client::{CommandOutput, Session, SessionConfig};
pub use error::{Error, Result};
