//! The verification reconciler.
//!
//! A verdict reports three independent facts side by side: the local
//! record (or its absence), the on-chain state (or that the ledger could
//! not be checked), and an artifact access URL (or that resolution is
//! degraded). Verification is read-only and never fails outright; every
//! degraded input is reported in place rather than swallowed or promoted
//! to an error.

use crate::error::ServiceResult;
use crate::service::CertService;
use certanchor_core::Fingerprint;
use certanchor_ledger::LedgerQuery;
use certanchor_registry::CertificateRecord;
use certanchor_store::Locator;
use serde::Serialize;
use tracing::warn;

/// The outcome of verifying one fingerprint
#[derive(Debug, Serialize)]
pub struct Verdict {
    /// The fingerprint the verdict is about
    pub fingerprint: Fingerprint,
    /// Authoritative local record, if one exists
    pub local_record: Option<CertificateRecord>,
    /// Independent on-chain projection
    pub on_chain: LedgerQuery,
    /// Artifact access URL; null when resolution is degraded
    pub pdf_url: Option<String>,
}

impl CertService {
    /// Verify a fingerprint against the local registry and the ledger.
    ///
    /// # Errors
    ///
    /// Returns error only on registry backend failure; absence of a record,
    /// an unreachable ledger, and an unresolvable artifact URL are all
    /// reported inside the verdict
    pub async fn verify(&self, fingerprint: Fingerprint) -> ServiceResult<Verdict> {
        let local_record = self.registry.certificate_by_fingerprint(&fingerprint)?;
        let on_chain = self.ledger.verify(&fingerprint).await;
        let pdf_url = local_record
            .as_ref()
            .and_then(|record| self.resolve_pdf_url(&record.artifact_locator));
        Ok(Verdict {
            fingerprint,
            local_record,
            on_chain,
            pdf_url,
        })
    }

    /// Verify raw artifact bytes via the content-hash index.
    ///
    /// A known content hash resolves to its record's canonical fingerprint
    /// and takes the same verdict path as [`Self::verify`]; an unknown hash
    /// falls through to a direct ledger query on the content hash itself.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify`]
    pub async fn verify_bytes(&self, bytes: &[u8]) -> ServiceResult<Verdict> {
        let content_hash = Fingerprint::compute(bytes);
        match self.registry.certificate_by_content_hash(&content_hash)? {
            Some(record) => self.verify(record.fingerprint).await,
            None => {
                let on_chain = self.ledger.verify(&content_hash).await;
                Ok(Verdict {
                    fingerprint: content_hash,
                    local_record: None,
                    on_chain,
                    pdf_url: None,
                })
            }
        }
    }

    /// Resolve a stored locator to an access URL, degrading to `None`.
    ///
    /// Resolution failure (unparseable locator, remote locator while the
    /// store is local-only) is a serving problem, not a verification
    /// problem; it is logged and the URL is omitted.
    pub(crate) fn resolve_pdf_url(&self, locator_raw: &str) -> Option<String> {
        let locator = match locator_raw.parse::<Locator>() {
            Ok(locator) => locator,
            Err(e) => {
                warn!(error = %e, "record carries an unparseable artifact locator");
                return None;
            }
        };
        match self.store.access_url(&locator) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, locator = %locator, "artifact URL resolution degraded");
                None
            }
        }
    }
}
