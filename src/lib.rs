//! # eweb
//!
//! A thin convenience layer over Axum: colorized access logging, a liveness
//! probe filter, template rendering and a ready-made server loop.
//!
//! ## Access log
//!
//! Every request passes through [`middleware::request_log`], which writes one
//! line per request:
//!
//! ```text
//! [eweb] 2026-10-19 14:03:11 | 404 | GET | /missing | 310.5µs | 10.0.0.1 | 0B | 88B
//! ```
//!
//! In release mode (`SERVER_MODE=release`) only responses with status >= 400
//! are logged.
//!
//! ## Quick Start
//!
//! ```bash
//! export SERVER_MODE=debug
//! export STATIC_DIR=./public  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod web;

pub use error::AppError;
pub use state::AppState;

