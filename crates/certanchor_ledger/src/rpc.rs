//! Live JSON-RPC client against the ledger gateway.
//!
//! The gateway exposes a fingerprint-keyed contract surface: `cert_issue`
//! and `cert_revoke` submit transactions and block until one confirmation,
//! `cert_verify` is a read-only state query. Submissions are serialized
//! through a mutex because concurrent transactions from one signing
//! identity would race on the account nonce.

use crate::adapter::LedgerError;
use crate::types::{LedgerQuery, OnChainState, TxRef};
use certanchor_core::Fingerprint;
use jsonrpsee::core::ClientError;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HeaderMap, HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Receipt returned by the gateway for a confirmed submission
#[derive(Debug, Clone, Deserialize)]
struct TxReceipt {
    /// Transaction reference
    tx_ref: String,
    /// Execution status of the confirmed transaction
    status: ReceiptStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ReceiptStatus {
    Confirmed,
    Reverted,
}

/// Connected ledger client
pub struct RpcLedger {
    client: HttpClient,
    contract: String,
    identity: String,
    query_timeout: Duration,
    // Nonce coordination: one in-flight submission per signing identity.
    submit_lock: Mutex<()>,
}

impl RpcLedger {
    /// Build a client for the gateway endpoint.
    ///
    /// The signing credential rides as a bearer header; the request
    /// timeout covers the confirmation wait for submissions.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL or credential is malformed
    pub fn new(
        endpoint: &str,
        credential: &SecretString,
        contract: String,
        identity: String,
        confirm_timeout: Duration,
        query_timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", credential.expose_secret());
        headers.insert(
            "authorization",
            bearer.parse().map_err(|_| LedgerError::Config {
                reason: "signing credential is not a valid header value".to_string(),
            })?,
        );

        let client = HttpClientBuilder::default()
            .request_timeout(confirm_timeout)
            .set_headers(headers)
            .build(endpoint)
            .map_err(|e| LedgerError::Config {
                reason: format!("invalid ledger endpoint: {e}"),
            })?;

        Ok(Self {
            client,
            contract,
            identity,
            query_timeout,
            submit_lock: Mutex::new(()),
        })
    }

    /// Submit an issuance transaction and wait for one confirmation.
    ///
    /// # Errors
    ///
    /// `Unavailable` for transport failures, `Timeout` when confirmation
    /// does not arrive in time, `Execution` when the transaction landed
    /// but reverted. Never retried internally.
    pub async fn issue(&self, fingerprint: &Fingerprint) -> Result<TxRef, LedgerError> {
        self.submit("cert_issue", fingerprint).await
    }

    /// Submit a revocation transaction and wait for one confirmation.
    ///
    /// The contract rejects revocation of a fingerprint it never issued;
    /// that surfaces as an `Execution` error.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::issue`]
    pub async fn revoke(&self, fingerprint: &Fingerprint) -> Result<TxRef, LedgerError> {
        self.submit("cert_revoke", fingerprint).await
    }

    async fn submit(&self, method: &str, fingerprint: &Fingerprint) -> Result<TxRef, LedgerError> {
        let _guard = self.submit_lock.lock().await;
        debug!(method, %fingerprint, "submitting ledger transaction");

        let receipt: TxReceipt = self
            .client
            .request(
                method,
                rpc_params![&self.contract, fingerprint.to_hex(), &self.identity],
            )
            .await
            .map_err(|e| Self::map_submit_error(method, e))?;

        match receipt.status {
            ReceiptStatus::Confirmed => Ok(TxRef::new(receipt.tx_ref)),
            ReceiptStatus::Reverted => Err(LedgerError::Execution {
                tx_ref: receipt.tx_ref,
                reason: format!("{method} transaction reverted"),
            }),
        }
    }

    /// Read-only state query with a short timeout.
    ///
    /// Unreachable-gateway conditions degrade to `Unavailable` rather than
    /// erroring, so the read path never fails on connectivity.
    pub async fn verify(&self, fingerprint: &Fingerprint) -> LedgerQuery {
        let request = self.client.request::<OnChainState, _>(
            "cert_verify",
            rpc_params![&self.contract, fingerprint.to_hex()],
        );

        match tokio::time::timeout(self.query_timeout, request).await {
            Ok(Ok(state)) => LedgerQuery::Checked(state),
            Ok(Err(e)) => {
                warn!(%fingerprint, error = %e, "ledger verify failed, reporting unavailable");
                LedgerQuery::Unavailable
            }
            Err(_) => {
                warn!(%fingerprint, "ledger verify timed out, reporting unavailable");
                LedgerQuery::Unavailable
            }
        }
    }

    fn map_submit_error(operation: &str, err: ClientError) -> LedgerError {
        match err {
            // The gateway executed the call and the contract refused it.
            ClientError::Call(obj) => LedgerError::Execution {
                tx_ref: String::new(),
                reason: format!("{} (code {})", obj.message(), obj.code()),
            },
            ClientError::RequestTimeout => LedgerError::Timeout {
                operation: operation.to_string(),
            },
            other => LedgerError::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}
