//! # Classic Plus API
//!
//! HTTP backend for the Classic Plus community site.
//!
//! ## Modules
//!
//! - [`config`]: Settings, CORS and dependency initialization
//! - [`server`]: Router, request handlers and application state
//! - [`identity`]: Discord OAuth2 code exchange
//! - [`survey`]: The survey definition served to clients
//! - [`errors`]: API and startup error types
//! - [`telemetry`]: Tracing setup

pub mod config;
pub mod errors;
pub mod identity;
pub mod server;
pub mod survey;
pub mod telemetry;

pub use config::{Dependencies, Settings};
pub use errors::{ApiError, StartupError};
