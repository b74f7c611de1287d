//! Certanchor Record Store
//!
//! The durable, authoritative local records: issued certificates keyed by
//! fingerprint, organizations, and the actor directory supplied by the
//! external auth boundary. Fingerprint uniqueness is a primary-key
//! constraint, so concurrent duplicate issuance loses the race at the
//! persistence stage rather than overwriting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod registry;

pub use record::{CertificateRecord, OrgRecord};
pub use registry::{Registry, RegistryError};
