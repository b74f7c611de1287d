//! Ledger state and transaction reference types.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Reference to a submitted ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRef(String);

impl TxRef {
    /// Wrap a raw transaction reference
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw reference string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxRef {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// The on-chain projection of a certificate, keyed by fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainState {
    /// Fingerprint is recorded on the ledger
    pub exists: bool,
    /// Issuer address/identity as reported by the contract
    pub issuer: String,
    /// On-chain issuance timestamp (unix seconds)
    pub timestamp: i64,
    /// On-chain revoked flag
    pub revoked: bool,
}

/// Outcome of a read-only ledger query.
///
/// `Unavailable` means the ledger could not be checked, which callers must
/// distinguish from a checked-and-absent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerQuery {
    /// The ledger answered; here is the projected state
    Checked(OnChainState),
    /// The ledger endpoint could not be reached
    Unavailable,
}

impl LedgerQuery {
    /// The checked state, if the ledger answered
    #[must_use]
    pub fn state(&self) -> Option<&OnChainState> {
        match self {
            Self::Checked(state) => Some(state),
            Self::Unavailable => None,
        }
    }
}

// Wire shape: the checked state serializes verbatim; the unavailable marker
// serializes as {"available": false}.
impl Serialize for LedgerQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Checked(state) => state.serialize(serializer),
            Self::Unavailable => {
                let mut s = serializer.serialize_struct("LedgerQuery", 1)?;
                s.serialize_field("available", &false)?;
                s.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_ref_display() {
        let tx = TxRef::new("0xabc");
        assert_eq!(tx.to_string(), "0xabc");
        assert_eq!(tx.as_str(), "0xabc");
    }

    #[test]
    fn test_checked_serializes_verbatim() {
        let query = LedgerQuery::Checked(OnChainState {
            exists: true,
            issuer: "0xfeed".to_string(),
            timestamp: 1_700_000_000,
            revoked: false,
        });
        let json: serde_json::Value = serde_json::to_value(&query).unwrap();
        assert_eq!(json["exists"], true);
        assert_eq!(json["issuer"], "0xfeed");
        assert_eq!(json["revoked"], false);
    }

    #[test]
    fn test_unavailable_serializes_marker() {
        let json = serde_json::to_string(&LedgerQuery::Unavailable).unwrap();
        assert_eq!(json, "{\"available\":false}");
    }

    #[test]
    fn test_state_accessor() {
        assert!(LedgerQuery::Unavailable.state().is_none());
        let state = OnChainState {
            exists: false,
            issuer: String::new(),
            timestamp: 0,
            revoked: false,
        };
        assert_eq!(LedgerQuery::Checked(state.clone()).state(), Some(&state));
    }
}
