//! Observability for Twin: tracing subscriber setup and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing, TracingOptions};
