//! Durable row types.

use certanchor_core::{CertificateId, Fingerprint, OrgId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authoritative local entry for an issued certificate.
///
/// The fingerprint is immutable once assigned and globally unique; the
/// revoked flag is monotonic (there is no un-revoke path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Opaque unique identifier
    pub id: CertificateId,
    /// Canonical field-based fingerprint (system of record)
    pub fingerprint: Fingerprint,
    /// Digest of the rendered artifact bytes, kept as a secondary lookup aid
    pub content_hash: Option<Fingerprint>,
    /// Certificate owner (recipient) name
    pub owner_name: String,
    /// Completed course name
    pub course_name: String,
    /// Issuing organization
    pub issued_by: OrgId,
    /// Where the artifact lives (opaque locator string)
    pub artifact_locator: String,
    /// Issuance transaction reference; the mock sentinel in degraded mode
    pub tx_ref: Option<String>,
    /// Monotonic revoked flag
    pub revoked: bool,
    /// Revocation transaction reference, set when revoked flips
    pub revocation_tx_ref: Option<String>,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

/// An issuing organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRecord {
    /// Opaque unique identifier
    pub id: OrgId,
    /// Unique organization name
    pub name: String,
    /// Wallet/account reference on the ledger
    pub wallet_address: Option<String>,
    /// Organization domain
    pub domain: Option<String>,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
}

impl OrgRecord {
    /// Create a new organization row
    #[must_use]
    pub fn new(name: String, wallet_address: Option<String>, domain: Option<String>) -> Self {
        Self {
            id: OrgId::new(),
            name,
            wallet_address,
            domain,
            created_at: Utc::now(),
        }
    }
}
