//! Poet Infrastructure Library
//!
//! Process-level plumbing shared by the binaries: logging and tracing setup.

pub mod telemetry;

pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};
