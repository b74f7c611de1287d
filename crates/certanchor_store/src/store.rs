//! The artifact store capability.
//!
//! Mode is selected exactly once at construction: a successful startup
//! probe yields the connected variant, anything else pins the store to
//! local-only for its lifetime. Callers never branch on connectivity, only
//! on the locator variant they get back.

use crate::local::{LocalConfig, LocalStore};
use crate::locator::Locator;
use crate::remote::{RemoteConfig, RemoteStore};
use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};

/// Artifact store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure on the local path
    #[error("artifact store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// Remote gateway could not be reached
    #[error("object store transport failure: {reason}")]
    Transport {
        /// Underlying transport detail
        reason: String,
    },
    /// Remote gateway answered with a non-success status
    #[error("object store rejected upload with status {status}")]
    UploadRejected {
        /// HTTP status code
        status: u16,
    },
    /// A remote locator cannot be resolved while the store is degraded
    #[error("cannot resolve remote locator: store is in local-only mode")]
    RemoteUnavailable,
}

enum StoreMode {
    /// Remote gateway reachable at startup
    Connected(RemoteStore),
    /// Probe failed or no remote configured; local-only until restart
    Degraded,
}

/// Durable artifact storage with a remote primary path and a local
/// fallback namespace that is always available.
pub struct ArtifactStore {
    mode: StoreMode,
    local: LocalStore,
}

impl ArtifactStore {
    /// Construct the store, probing the remote gateway once.
    ///
    /// A failed probe logs a warning and selects local-only mode; there is
    /// no automatic promotion back to remote mode without a restart.
    ///
    /// # Errors
    ///
    /// Returns error only if the local namespace cannot be created
    pub async fn connect(
        remote: Option<RemoteConfig>,
        local: LocalConfig,
    ) -> Result<Self, StoreError> {
        let local = LocalStore::new(local)?;
        let mode = match remote {
            Some(config) => {
                let remote = RemoteStore::new(config);
                match remote.probe().await {
                    Ok(()) => {
                        info!("object store connected");
                        StoreMode::Connected(remote)
                    }
                    Err(e) => {
                        warn!(error = %e, "object store unreachable, degrading to local-only mode");
                        StoreMode::Degraded
                    }
                }
            }
            None => {
                warn!("no object store configured, artifact storage is local-only");
                StoreMode::Degraded
            }
        };
        Ok(Self { mode, local })
    }

    /// Construct a local-only store without probing anything
    ///
    /// # Errors
    ///
    /// Returns error if the local namespace cannot be created
    pub fn local_only(local: LocalConfig) -> Result<Self, StoreError> {
        Ok(Self {
            mode: StoreMode::Degraded,
            local: LocalStore::new(local)?,
        })
    }

    /// True when operating without a remote gateway
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.mode, StoreMode::Degraded)
    }

    /// Store an artifact under the given object name.
    ///
    /// In connected mode this uploads remotely and returns a remote
    /// locator; per-call upload failures are returned to the caller, who
    /// decides whether to fall back via [`Self::put_local`]. In degraded
    /// mode the artifact is copied locally.
    ///
    /// # Errors
    ///
    /// Returns error on upload or copy failure
    pub async fn put(&self, artifact: &Path, object_name: &str) -> Result<Locator, StoreError> {
        match &self.mode {
            StoreMode::Connected(remote) => {
                remote.put(artifact, object_name).await?;
                Ok(Locator::Remote(object_name.to_string()))
            }
            StoreMode::Degraded => self.put_local(artifact, object_name),
        }
    }

    /// Copy an artifact into the local fallback namespace unconditionally.
    ///
    /// # Errors
    ///
    /// Returns error if the copy fails
    pub fn put_local(&self, artifact: &Path, object_name: &str) -> Result<Locator, StoreError> {
        self.local.put(artifact, object_name)?;
        Ok(Locator::Local(object_name.to_string()))
    }

    /// Resolve a locator to an access URL.
    ///
    /// Remote locators get a time-bounded signed URL; local locators get a
    /// static path under the server's public base.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RemoteUnavailable`] for a remote locator while
    /// the store is in local-only mode (no signing key holder available)
    pub fn access_url(&self, locator: &Locator) -> Result<String, StoreError> {
        match locator {
            Locator::Local(name) => Ok(self.local.url(name)),
            Locator::Remote(name) => match &self.mode {
                StoreMode::Connected(remote) => Ok(remote.presigned_url(name, Utc::now())),
                StoreMode::Degraded => Err(StoreError::RemoteUnavailable),
            },
        }
    }

    /// Root directory for static serving of local-fallback artifacts
    #[must_use]
    pub fn serve_root(&self) -> std::path::PathBuf {
        self.local.serve_root()
    }
}
