//! Certificate rendering with atomic staging.

use crate::pdf::{self, LinkAnnotation, TextLine};
use certanchor_core::Fingerprint;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Inputs for one certificate render
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Certificate owner (recipient) name
    pub owner_name: String,
    /// Completed course name
    pub course_name: String,
    /// Issuing organization name
    pub organization: String,
    /// Canonical fingerprint to embed
    pub fingerprint: Fingerprint,
    /// Human-facing verification page for the fingerprint
    pub verify_url: String,
    /// Issuance instant; the printed date is truncated to day
    pub issued_at: DateTime<Utc>,
}

/// A successfully rendered artifact, visible only after the staging rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Final path inside the staging directory
    pub path: PathBuf,
    /// File name component (used to derive the object name)
    pub file_name: String,
    /// Rendered size in bytes
    pub size: u64,
}

/// Rendering-pipeline errors, fatal to the issuance attempt
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Staging directory could not be created or written
    #[error("staging I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// Completed document could not be moved into place
    #[error("failed to persist rendered artifact: {reason}")]
    Persist {
        /// Underlying rename failure
        reason: String,
    },
}

/// Renders certificate documents into a staging directory.
///
/// Each render writes exactly one new file and never mutates a prior one.
pub struct CertificateRenderer {
    staging_dir: PathBuf,
}

impl CertificateRenderer {
    /// Create a renderer rooted at `staging_dir`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created
    pub fn new(staging_dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let staging_dir = staging_dir.into();
        std::fs::create_dir_all(&staging_dir)?;
        Ok(Self { staging_dir })
    }

    /// The staging directory artifacts land in
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Render a certificate document.
    ///
    /// The document embeds the fingerprint as human-readable text and the
    /// verification URL as a clickable link annotation. Bytes go to a temp
    /// file first and are renamed into place only once complete, so a
    /// failed render leaves nothing visible besides a discarded temp file.
    ///
    /// # Errors
    ///
    /// Returns error on any staging I/O or persist failure
    pub fn render(&self, req: &RenderRequest) -> Result<RenderedArtifact, RenderError> {
        let bytes = Self::document_bytes(req);
        let file_name = Self::file_name(&req.owner_name, req.issued_at);
        let final_path = self.staging_dir.join(&file_name);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.staging_dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(&final_path).map_err(|e| RenderError::Persist {
            reason: e.error.to_string(),
        })?;

        debug!(path = %final_path.display(), size = bytes.len(), "rendered certificate artifact");
        Ok(RenderedArtifact {
            path: final_path,
            file_name,
            size: bytes.len() as u64,
        })
    }

    fn document_bytes(req: &RenderRequest) -> Vec<u8> {
        let date = req.issued_at.format("%Y-%m-%d").to_string();
        let lines = vec![
            TextLine::bold("CERTIFICATE OF COMPLETION", 30.0, 742.0),
            TextLine::regular("This is to certify that", 18.0, 662.0),
            TextLine::bold(req.owner_name.clone(), 24.0, 622.0),
            TextLine::regular("has successfully completed the course", 18.0, 562.0),
            TextLine::bold(req.course_name.clone(), 20.0, 522.0),
            TextLine::regular(format!("Issued by: {}", req.organization), 14.0, 100.0),
            TextLine::regular(format!("Date: {date}"), 14.0, 80.0),
            TextLine::regular(format!("Fingerprint: {}", req.fingerprint), 8.0, 60.0),
            TextLine::regular(format!("Verify at: {}", req.verify_url), 8.0, 46.0),
        ];
        let link = LinkAnnotation {
            uri: req.verify_url.clone(),
            rect: [36.0, 40.0, 559.0, 70.0],
        };
        pdf::document(&lines, &link)
    }

    fn file_name(owner_name: &str, issued_at: DateTime<Utc>) -> String {
        let owner: String = owner_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("cert_{}_{}.pdf", owner, issued_at.format("%Y%m%d%H%M%S"))
    }
}
