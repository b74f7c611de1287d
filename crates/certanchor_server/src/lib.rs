//! Certanchor Server
//!
//! The HTTP boundary: an axum router over the certificate service, plus
//! the settings that select component modes (live or degraded) at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod settings;

pub use api::{ApiError, AppState, router};
pub use settings::Settings;
