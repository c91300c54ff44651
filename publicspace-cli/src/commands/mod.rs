//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`classify`] - Classify one area from local data directories
//! - [`batch`] - Download and classify every area in an AOI file
//! - [`config`] - Configuration management (path, show, init)

pub mod batch;
pub mod classify;
pub mod config;
