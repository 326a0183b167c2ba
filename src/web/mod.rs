//! Server-rendered pages.
//!
//! Uses Askama templates from `templates/`; rendering failures are turned into
//! `500` responses by `askama_web`.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod routes;
