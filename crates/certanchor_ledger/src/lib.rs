//! Certanchor Ledger Adapter
//!
//! The single gateway to the blockchain. Issue and revoke submit
//! state-changing transactions keyed by certificate fingerprint and wait
//! for a single confirmation; verify is a read-only query that degrades to
//! an explicit `Unavailable` marker instead of erroring. With no endpoint
//! configured the adapter runs in a deterministic mock mode so the rest of
//! the system is testable without a live chain.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod mock;
pub mod rpc;
pub mod types;

pub use adapter::{LedgerAdapter, LedgerConfig, LedgerError};
pub use mock::{MOCK_TX_REF, MockLedger};
pub use rpc::RpcLedger;
pub use types::{LedgerQuery, OnChainState, TxRef};
