//! HTTP middleware installed around the router.
//!
//! Provides the colorized access log and the liveness probe filter.

pub mod health_probe;
pub mod request_log;

pub use request_log::{LogSink, MemorySink, RequestLogger, RequestRecord};
