//! Certanchor Service
//!
//! The orchestration layer: issuance pipeline, revocation, administrative
//! deletion, and the verification reconciler, over components selected
//! once at startup (registry, renderer, artifact store, ledger adapter).
//! This crate also defines the error taxonomy the HTTP boundary maps to
//! status codes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod service;
pub mod verify;

pub use error::{ServiceError, ServiceResult};
pub use service::{CertService, Issued, ServiceConfig};
pub use verify::Verdict;
