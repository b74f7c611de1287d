//! Local filesystem fallback storage.

use crate::store::StoreError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local fallback configuration
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Root directory for fallback copies
    pub root: PathBuf,
    /// Bucket namespace mirrored under the root
    pub bucket: String,
    /// Base URL the server exposes local artifacts under
    pub public_base: String,
}

/// Filesystem store that mirrors the remote bucket layout under a root
/// directory and serves artifacts through static paths.
#[derive(Debug, Clone)]
pub struct LocalStore {
    config: LocalConfig,
}

impl LocalStore {
    /// Create a local store, creating its namespace directory.
    ///
    /// # Errors
    ///
    /// Returns error if the namespace directory cannot be created
    pub fn new(config: LocalConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(config.root.join(&config.bucket))?;
        Ok(Self { config })
    }

    /// Copy an artifact into the local namespace.
    ///
    /// # Errors
    ///
    /// Returns error if the copy fails
    pub fn put(&self, artifact: &Path, object_name: &str) -> Result<(), StoreError> {
        let dest = self.object_path(object_name);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(artifact, &dest)?;
        debug!(dest = %dest.display(), "stored artifact locally");
        Ok(())
    }

    /// Static access URL for a locally stored object
    #[must_use]
    pub fn url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/{}/{}",
            self.config.public_base.trim_end_matches('/'),
            self.config.bucket,
            object_name
        )
    }

    /// Filesystem path of a stored object
    #[must_use]
    pub fn object_path(&self, object_name: &str) -> PathBuf {
        self.config.root.join(&self.config.bucket).join(object_name)
    }

    /// The directory static serving should be rooted at
    #[must_use]
    pub fn serve_root(&self) -> PathBuf {
        self.config.root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> LocalStore {
        LocalStore::new(LocalConfig {
            root: dir.to_path_buf(),
            bucket: "certs".to_string(),
            public_base: "http://localhost:8080/".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_put_copies_into_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.pdf");
        std::fs::write(&src, b"pdf bytes").unwrap();

        let store = store(dir.path());
        store.put(&src, "certificates/a.pdf").unwrap();

        let stored = store.object_path("certificates/a.pdf");
        assert_eq!(std::fs::read(stored).unwrap(), b"pdf bytes");
    }

    #[test]
    fn test_url_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert_eq!(
            store.url("certificates/a.pdf"),
            "http://localhost:8080/storage/certs/certificates/a.pdf"
        );
    }

    #[test]
    fn test_put_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let missing = dir.path().join("missing.pdf");
        assert!(store.put(&missing, "certificates/m.pdf").is_err());
    }
}
