//! Certanchor Core Types
//!
//! This crate contains pure types and logic with no network I/O.
//! Fingerprints, entity identifiers, and the shared validation error live
//! here so that every other crate agrees on them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fingerprint;
pub mod id;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use id::{ActorId, CertificateId, OrgId};
