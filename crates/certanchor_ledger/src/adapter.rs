//! The ledger capability handed to the orchestrator.
//!
//! Selected exactly once at startup: endpoint plus signing credential
//! yields the connected variant, anything less yields the mock. Callers
//! never branch on configuration, only on the results they receive.

use crate::mock::MockLedger;
use crate::rpc::RpcLedger;
use crate::types::{LedgerQuery, TxRef};
use certanchor_core::Fingerprint;
use secrecy::SecretString;
use std::time::Duration;
use tracing::{info, warn};

/// Ledger adapter configuration, assembled from opaque settings inputs
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Gateway endpoint URL; `None` selects mock mode
    pub endpoint: Option<String>,
    /// Signing credential; `None` selects mock mode
    pub credential: Option<SecretString>,
    /// Contract address on the ledger
    pub contract: String,
    /// This service's signing identity as known to the gateway
    pub identity: String,
    /// Bound on the submit-and-confirm wait (dominant latency source)
    pub confirm_timeout: Duration,
    /// Bound on read-only verify queries
    pub query_timeout: Duration,
}

/// Ledger operation errors (live mode only; the mock never fails)
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Adapter misconfiguration caught at construction
    #[error("ledger configuration error: {reason}")]
    Config {
        /// What was wrong
        reason: String,
    },
    /// The gateway could not be reached
    #[error("ledger unavailable: {reason}")]
    Unavailable {
        /// Transport detail
        reason: String,
    },
    /// Confirmation did not arrive within the bounded wait
    #[error("ledger operation timed out: {operation}")]
    Timeout {
        /// Operation that timed out
        operation: String,
    },
    /// Transaction landed on-chain but reported failed execution
    #[error("ledger execution failure ({tx_ref}): {reason}")]
    Execution {
        /// Transaction reference if one was assigned
        tx_ref: String,
        /// Failure detail from the gateway/contract
        reason: String,
    },
}

/// The two-variant ledger capability
pub enum LedgerAdapter {
    /// Live gateway client
    Connected(RpcLedger),
    /// Deterministic mock, no network
    Degraded(MockLedger),
}

impl LedgerAdapter {
    /// Select the variant from configuration, once.
    ///
    /// # Errors
    ///
    /// Returns error if live configuration is present but malformed
    pub fn from_config(config: LedgerConfig) -> Result<Self, LedgerError> {
        match (config.endpoint, config.credential) {
            (Some(endpoint), Some(credential)) => {
                let client = RpcLedger::new(
                    &endpoint,
                    &credential,
                    config.contract,
                    config.identity,
                    config.confirm_timeout,
                    config.query_timeout,
                )?;
                info!(endpoint = %endpoint, "ledger adapter connected");
                Ok(Self::Connected(client))
            }
            _ => {
                warn!("no ledger endpoint/credential configured, running in mock mode");
                Ok(Self::Degraded(MockLedger::new()))
            }
        }
    }

    /// Construct the mock variant directly (test fixtures, local dev)
    #[must_use]
    pub fn degraded() -> Self {
        Self::Degraded(MockLedger::new())
    }

    /// True when running against the mock
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Record a fingerprint as issued, blocking until confirmed.
    ///
    /// # Errors
    ///
    /// Fatal on connectivity, timeout, or execution failure; never retried
    /// internally because resubmission risks double-issuance
    pub async fn issue(&self, fingerprint: &Fingerprint) -> Result<TxRef, LedgerError> {
        match self {
            Self::Connected(rpc) => rpc.issue(fingerprint).await,
            Self::Degraded(mock) => Ok(mock.issue(fingerprint)),
        }
    }

    /// Set the on-chain revoked flag, blocking until confirmed.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::issue`]; the live contract additionally
    /// rejects fingerprints it never issued
    pub async fn revoke(&self, fingerprint: &Fingerprint) -> Result<TxRef, LedgerError> {
        match self {
            Self::Connected(rpc) => rpc.revoke(fingerprint).await,
            Self::Degraded(mock) => Ok(mock.revoke(fingerprint)),
        }
    }

    /// Read-only state query; never an error
    pub async fn verify(&self, fingerprint: &Fingerprint) -> LedgerQuery {
        match self {
            Self::Connected(rpc) => rpc.verify(fingerprint).await,
            Self::Degraded(mock) => mock.verify(fingerprint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MOCK_TX_REF;

    fn mock_config() -> LedgerConfig {
        LedgerConfig {
            endpoint: None,
            credential: None,
            contract: "0xc0ffee".to_string(),
            identity: "issuer-1".to_string(),
            confirm_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_missing_endpoint_selects_mock() {
        let adapter = LedgerAdapter::from_config(mock_config()).unwrap();
        assert!(adapter.is_degraded());
    }

    #[test]
    fn test_endpoint_without_credential_selects_mock() {
        let mut config = mock_config();
        config.endpoint = Some("http://ledger:8545".to_string());
        let adapter = LedgerAdapter::from_config(config).unwrap();
        assert!(adapter.is_degraded());
    }

    #[test]
    fn test_full_config_selects_connected() {
        let mut config = mock_config();
        config.endpoint = Some("http://ledger:8545".to_string());
        config.credential = Some(SecretString::from("key".to_string()));
        let adapter = LedgerAdapter::from_config(config).unwrap();
        assert!(!adapter.is_degraded());
    }

    #[tokio::test]
    async fn test_degraded_issue_returns_sentinel() {
        let adapter = LedgerAdapter::degraded();
        let fp = Fingerprint::compute(b"cert");
        let tx = adapter.issue(&fp).await.unwrap();
        assert_eq!(tx.as_str(), MOCK_TX_REF);
    }

    #[tokio::test]
    async fn test_degraded_verify_stub() {
        let adapter = LedgerAdapter::degraded();
        let query = adapter.verify(&Fingerprint::compute(b"cert")).await;
        let state = query.state().unwrap();
        assert!(state.exists);
        assert!(!state.revoked);
    }
}
