//! Deterministic mock ledger for unconfigured deployments.

use crate::types::{LedgerQuery, OnChainState, TxRef};
use certanchor_core::Fingerprint;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// The documented sentinel transaction reference returned in mock mode.
/// Recognizable in records and telemetry as "no ledger was contacted".
pub const MOCK_TX_REF: &str = "MOCK_TX_HASH_NO_RPC";

/// Issuer identity reported by the mock verify stub
const MOCK_ISSUER: &str = "mock-ledger";

/// Stand-in for the ledger gateway with no chain state.
///
/// Issue and revoke return the sentinel reference without touching any
/// network; verify reports a fixed exists/not-revoked state. Every call is
/// logged with the degraded marker so mock results are never mistaken for
/// genuine on-chain confirmations. A submission counter records how many
/// state-changing calls arrived, shared across clones.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    submissions: Arc<AtomicUsize>,
}

impl MockLedger {
    /// Create the mock ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of state-changing calls (issue + revoke) received so far
    #[must_use]
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Record an issuance (no-op, sentinel reference)
    #[must_use]
    pub fn issue(&self, fingerprint: &Fingerprint) -> TxRef {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        info!(mode = "degraded", %fingerprint, "mock ledger issue, no transaction submitted");
        TxRef::new(MOCK_TX_REF)
    }

    /// Record a revocation (no-op, sentinel reference).
    ///
    /// The mock's verify stub reports every fingerprint as issued, so
    /// revoke is consistently unconditional here; never-issued rejection is
    /// the live gateway's concern.
    #[must_use]
    pub fn revoke(&self, fingerprint: &Fingerprint) -> TxRef {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        info!(mode = "degraded", %fingerprint, "mock ledger revoke, no transaction submitted");
        TxRef::new(MOCK_TX_REF)
    }

    /// Fixed exists/not-revoked stub
    #[must_use]
    pub fn verify(&self, fingerprint: &Fingerprint) -> LedgerQuery {
        info!(mode = "degraded", %fingerprint, "mock ledger verify stub");
        LedgerQuery::Checked(OnChainState {
            exists: true,
            issuer: MOCK_ISSUER.to_string(),
            timestamp: Utc::now().timestamp(),
            revoked: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_returns_sentinel() {
        let ledger = MockLedger::new();
        let fp = Fingerprint::compute(b"cert");
        assert_eq!(ledger.issue(&fp).as_str(), MOCK_TX_REF);
        assert_eq!(ledger.revoke(&fp).as_str(), MOCK_TX_REF);
    }

    #[test]
    fn test_submission_counter_shared_across_clones() {
        let ledger = MockLedger::new();
        let handle = ledger.clone();
        let fp = Fingerprint::compute(b"cert");

        assert_eq!(handle.submissions(), 0);
        let _ = ledger.issue(&fp);
        let _ = ledger.revoke(&fp);
        assert_eq!(handle.submissions(), 2);

        // Reads do not count as submissions.
        let _ = ledger.verify(&fp);
        assert_eq!(handle.submissions(), 2);
    }

    #[test]
    fn test_verify_stub_exists_not_revoked() {
        let ledger = MockLedger::new();
        let query = ledger.verify(&Fingerprint::compute(b"cert"));
        let state = query.state().unwrap();
        assert!(state.exists);
        assert!(!state.revoked);
        assert_eq!(state.issuer, MOCK_ISSUER);
    }
}
