//! Certanchor Artifact Store
//!
//! Durable storage for rendered certificate artifacts. The primary path
//! uploads to a remote object store; when the remote is unreachable at
//! startup the store pins itself to a local filesystem namespace for its
//! whole lifetime. Locators returned by `put` carry a prefix that records
//! which path stored the artifact.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod local;
pub mod locator;
pub mod remote;
pub mod store;

pub use local::{LocalConfig, LocalStore};
pub use locator::{Locator, LocatorError};
pub use remote::{RemoteConfig, RemoteStore};
pub use store::{ArtifactStore, StoreError};
