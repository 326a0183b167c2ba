//! Colorized access log middleware.
//!
//! Times every request and writes at most one line once the inner service has
//! produced a response:
//!
//! ```text
//! [eweb] 2026-10-19 14:03:11 | 200 | GET | /login | 1.204ms | 10.0.0.1 | 0B | 512B
//! ```
//!
//! In [`ServerMode::Release`] only responses with status >= 400 are logged; in
//! debug mode every request is.
//!
//! # Integration
//!
//! ```rust,ignore
//! use axum::{Router, middleware};
//! use eweb::middleware::request_log::{self, RequestLogger};
//!
//! let logger = RequestLogger::from_config(&config);
//! let app = Router::new()
//!     .route("/login", get(login_handler))
//!     .layer(middleware::from_fn_with_state(logger, request_log::layer));
//! ```

use axum::{
    body::HttpBody,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Local};
use colored::{Color, Colorize};
use std::{
    fmt,
    io::Write,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::config::{AccessLogTarget, Config, ServerMode};

const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Destination for finished access lines.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        // A closed stdout must not take the request down with it.
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }
}

/// Emits each line as a `tracing` event under the `eweb::access` target.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "eweb::access", "{line}");
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

/// Shared access log settings, cloned into every request.
#[derive(Clone)]
pub struct RequestLogger {
    mode: ServerMode,
    colorize: bool,
    tag: Arc<str>,
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("mode", &self.mode)
            .field("colorize", &self.colorize)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl RequestLogger {
    /// Colorized logger tagged `eweb`, writing to stdout.
    pub fn new(mode: ServerMode) -> Self {
        Self {
            mode,
            colorize: true,
            tag: Arc::from("eweb"),
            sink: Arc::new(StdoutSink),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let sink: Arc<dyn LogSink> = match config.access_log {
            AccessLogTarget::Stdout => Arc::new(StdoutSink),
            AccessLogTarget::Tracing => Arc::new(TracingSink),
        };

        Self::new(config.mode)
            .with_color(config.log_color)
            .with_sink(sink)
    }

    pub fn with_color(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<Arc<str>>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    fn emit(&self, record: &RequestRecord) {
        if !should_log(self.mode, record.status) {
            return;
        }
        self.sink
            .write_line(&format_line(record, &self.tag, self.colorize));
    }
}

/// Everything known about one request once it has finished.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub started_at: DateTime<Local>,
    pub method: String,
    pub uri: String,
    pub client_ip: String,
    /// Raw `Content-Length` of the request, `"0"` when absent.
    pub request_length: String,
    pub status: u16,
    pub response_length: u64,
    pub latency: Duration,
}

/// Logged when the client went away before a response was produced.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Owns the record while the inner service runs and emits it on drop.
///
/// Dropping without [`InFlight::complete`] means no response was produced:
/// a panic unwinding through the middleware is reported as 500, a cancelled
/// request as [`CLIENT_CLOSED_REQUEST`].
struct InFlight {
    logger: RequestLogger,
    record: RequestRecord,
    start: Instant,
    responded: bool,
}

impl InFlight {
    fn new(logger: RequestLogger, record: RequestRecord, start: Instant) -> Self {
        Self {
            logger,
            record,
            start,
            responded: false,
        }
    }

    fn complete(&mut self, response: &Response) {
        self.record.status = response.status().as_u16();
        self.record.response_length = response_length(response);
        self.responded = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.responded {
            self.record.status = if std::thread::panicking() {
                StatusCode::INTERNAL_SERVER_ERROR.as_u16()
            } else {
                CLIENT_CLOSED_REQUEST
            };
        }
        self.record.latency = self.start.elapsed();
        self.logger.emit(&self.record);
    }
}

/// Axum middleware that writes one access line per request.
///
/// The response is returned exactly as the inner service produced it.
pub async fn layer(State(logger): State<RequestLogger>, req: Request, next: Next) -> Response {
    let start = Instant::now();

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let mut in_flight = InFlight::new(
        logger,
        RequestRecord {
            started_at: Local::now(),
            method: req.method().to_string(),
            uri,
            client_ip: client_ip(req.headers(), peer),
            request_length: request_length(req.headers()),
            status: 0,
            response_length: 0,
            latency: Duration::ZERO,
        },
        start,
    );

    let response = next.run(req).await;
    in_flight.complete(&response);

    response
}

/// Whether a finished request is worth a line.
pub fn should_log(mode: ServerMode, status: u16) -> bool {
    mode.is_debug() || status >= 400
}

pub fn status_color(status: u16) -> Color {
    match status {
        200..=299 => Color::Green,
        300..=399 => Color::White,
        400..=499 => Color::Yellow,
        _ => Color::Red,
    }
}

/// `None` for methods without an assigned color.
pub fn method_color(method: &str) -> Option<Color> {
    match method {
        "GET" => Some(Color::Blue),
        "POST" => Some(Color::Cyan),
        "PUT" => Some(Color::Yellow),
        "DELETE" => Some(Color::Red),
        "PATCH" => Some(Color::Green),
        "HEAD" => Some(Color::Magenta),
        "OPTIONS" => Some(Color::White),
        _ => None,
    }
}

/// Resolves the originating client address.
///
/// Priority:
/// 1. First entry of `X-Forwarded-For`
/// 2. `X-Real-IP`
/// 3. Peer socket address without the port
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first) = header_str(headers, X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header_str(headers, X_REAL_IP) {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Request `Content-Length` as sent, `"0"` when missing or empty.
pub fn request_length(headers: &HeaderMap) -> String {
    header_str(headers, header::CONTENT_LENGTH.as_str())
        .unwrap_or("0")
        .to_string()
}

/// Body size of the response: exact size hint, then `Content-Length`, then 0.
pub fn response_length(response: &Response) -> u64 {
    response
        .body()
        .size_hint()
        .exact()
        .or_else(|| {
            response
                .headers()
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(0)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Renders one access line. With `colorize` the status and method always carry
/// ANSI escapes, whatever `colored` detected about the terminal.
pub fn format_line(record: &RequestRecord, tag: &str, colorize: bool) -> String {
    let status = record.status.to_string();

    let (status, method) = if colorize {
        colored::control::set_override(true);
        let method = match method_color(&record.method) {
            Some(color) => record.method.color(color).to_string(),
            None => record.method.normal().to_string(),
        };
        (status.color(status_color(record.status)).to_string(), method)
    } else {
        (status, record.method.clone())
    };

    format!(
        "[{tag}] {} | {} | {} | {} | {:?} | {} | {}B | {}B",
        record.started_at.format("%Y-%m-%d %H:%M:%S"),
        status,
        method,
        record.uri,
        record.latency,
        record.client_ip,
        record.request_length,
        record.response_length,
    )
}
