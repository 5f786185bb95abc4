// ABOUTME: Library root for provlita - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cli;
pub mod error;
pub mod logfile;
pub mod remote;
pub mod session;
pub mod ssh;
pub mod stage;
