//! Observability for threadshape.
//! `tracing` crate with `EnvFilter`, per-crate log levels.

pub mod setup;

pub use setup::{init_tracing, DEFAULT_FILTER, LOG_ENV_VAR};
