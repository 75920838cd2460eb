//! Cave Player command-line front end
//!
//! The binary lives in `main.rs`; this library exposes the configuration
//! layer so it can be tested without a terminal.

pub mod config;

pub use config::CliConfig;
