#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;

use eweb::config::{Config, ServerMode};
use eweb::middleware::{MemorySink, RequestLogger};
use eweb::routes::app_router;
use eweb::state::AppState;

/// Colorless logger writing into a fresh in-memory sink.
pub fn capture_logger(mode: ServerMode) -> (RequestLogger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let logger = RequestLogger::new(mode)
        .with_color(false)
        .with_sink(sink.clone());
    (logger, sink)
}

/// Application state whose access lines land in the returned sink.
pub fn create_test_state(mode: ServerMode) -> (AppState, Arc<MemorySink>) {
    let config = Config {
        mode,
        log_color: false,
        ..Config::default()
    };
    let (logger, sink) = capture_logger(mode);
    (AppState::new(config).with_access_log(logger), sink)
}

/// Splits a plain access line into its pipe-delimited fields.
pub fn fields(line: &str) -> Vec<String> {
    line.split(" | ").map(str::to_string).collect()
}

/// Test server over the full application router.
pub fn app_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state)).unwrap()
}
