//! Shared utilities for the news research crew
//!
//! Logging setup and the environment-variable helpers every crate uses to
//! build its configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, EnvSource};
pub use logging::init_tracing_with_default;
