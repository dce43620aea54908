//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! - [`config`] - Configuration management (init, show, path)
//! - [`fetch`] - Single tile query

pub mod config;
pub mod fetch;
