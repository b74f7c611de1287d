//! The issuance orchestrator.
//!
//! Owns all components and runs the issuance pipeline in a fixed stage
//! order: authorize, fingerprint, render, store, anchor, persist. The
//! fingerprint is computed before any I/O so a same-day duplicate can be
//! refused before artifacts exist; a concurrent duplicate that slips past
//! the pre-check still loses the race at the persistence constraint.
//! Artifacts written before a fatal ledger failure are deliberately left in
//! place: they reference a fingerprint that was never anchored and are
//! harmless.

use crate::error::{ServiceError, ServiceResult};
use certanchor_core::{ActorId, CertificateId, CoreError, Fingerprint, OrgId};
use certanchor_ledger::LedgerAdapter;
use certanchor_registry::{CertificateRecord, OrgRecord, Registry};
use certanchor_render::{CertificateRenderer, RenderRequest};
use certanchor_store::ArtifactStore;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the human-facing verification frontend
    pub frontend_base: String,
    /// Refuse issuance rather than fall back to a local artifact copy
    pub require_offsite: bool,
}

/// A completed issuance: the persisted record plus a resolved artifact URL
#[derive(Debug, Serialize)]
pub struct Issued {
    /// The durable record, exactly as persisted
    #[serde(flatten)]
    pub record: CertificateRecord,
    /// Access URL for the artifact; null when resolution is degraded
    pub pdf_url: Option<String>,
}

/// The certificate service: issuance, revocation, and verification over a
/// fixed set of components selected at startup.
pub struct CertService {
    pub(crate) registry: Registry,
    pub(crate) renderer: CertificateRenderer,
    pub(crate) store: ArtifactStore,
    pub(crate) ledger: LedgerAdapter,
    pub(crate) config: ServiceConfig,
}

impl CertService {
    /// Assemble the service from its components
    #[must_use]
    pub fn new(
        registry: Registry,
        renderer: CertificateRenderer,
        store: ArtifactStore,
        ledger: LedgerAdapter,
        config: ServiceConfig,
    ) -> Self {
        Self {
            registry,
            renderer,
            store,
            ledger,
            config,
        }
    }

    /// The verification page URL for a fingerprint
    #[must_use]
    pub fn verify_url(&self, fingerprint: &Fingerprint) -> String {
        format!("{}/verify/{fingerprint}", self.config.frontend_base)
    }

    /// Root directory for static serving of local-fallback artifacts
    #[must_use]
    pub fn storage_serve_root(&self) -> std::path::PathBuf {
        self.store.serve_root()
    }

    /// Issue a certificate on behalf of the actor's organization.
    ///
    /// # Errors
    ///
    /// `Validation` for empty fields, `Authorization` for unlinked actors,
    /// `Conflict` for a same-day duplicate, `Render`/`Storage`/`Ledger` for
    /// stage failures. A ledger failure aborts before persistence; nothing
    /// is rolled back.
    pub async fn issue(
        &self,
        actor: ActorId,
        owner_name: &str,
        course_name: &str,
    ) -> ServiceResult<Issued> {
        CoreError::require_non_empty("owner_name", owner_name)?;
        CoreError::require_non_empty("course_name", course_name)?;

        let org = self.actor_org(actor)?;
        let issued_at = Utc::now();
        let fingerprint = Fingerprint::from_fields(
            owner_name,
            course_name,
            &org.name,
            issued_at.date_naive(),
        );

        // Fast-fail before any artifact exists; the insert constraint below
        // still decides concurrent races.
        if self
            .registry
            .certificate_by_fingerprint(&fingerprint)?
            .is_some()
        {
            return Err(ServiceError::Conflict {
                what: format!("certificate {fingerprint}"),
            });
        }

        let artifact = self.renderer.render(&RenderRequest {
            owner_name: owner_name.to_string(),
            course_name: course_name.to_string(),
            organization: org.name.clone(),
            fingerprint,
            verify_url: self.verify_url(&fingerprint),
            issued_at,
        })?;

        let content_hash = match Fingerprint::from_file(&artifact.path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(error = %e, "could not hash rendered artifact, content lookup disabled for this record");
                None
            }
        };

        let object_name = format!("certificates/{}", artifact.file_name);
        let locator = match self.store.put(&artifact.path, &object_name).await {
            Ok(locator) => locator,
            Err(e) if self.config.require_offsite => {
                return Err(ServiceError::OffsiteStorage {
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "remote upload failed, falling back to local artifact copy");
                self.store
                    .put_local(&artifact.path, &object_name)
                    .map_err(ServiceError::Storage)?
            }
        };
        if self.config.require_offsite && locator.is_local() {
            return Err(ServiceError::OffsiteStorage {
                reason: "artifact store is in local-only mode".to_string(),
            });
        }

        let tx = self.ledger.issue(&fingerprint).await?;

        let record = CertificateRecord {
            id: CertificateId::new(),
            fingerprint,
            content_hash,
            owner_name: owner_name.to_string(),
            course_name: course_name.to_string(),
            issued_by: org.id,
            artifact_locator: locator.to_string(),
            tx_ref: Some(tx.as_str().to_string()),
            revoked: false,
            revocation_tx_ref: None,
            created_at: issued_at,
        };
        self.registry.insert_certificate(&record)?;

        info!(certificate = %record.id, fingerprint = %fingerprint, org = %org.id, "certificate issued");
        let pdf_url = self.resolve_pdf_url(&record.artifact_locator);
        Ok(Issued { record, pdf_url })
    }

    /// Revoke a certificate issued by the actor's organization.
    ///
    /// The local already-revoked guard runs before the ledger call so a
    /// repeat revocation never reaches the chain a second time.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids, `Authorization` across organizations,
    /// `AlreadyRevoked` on repeats, `Ledger` on submission failure
    pub async fn revoke(
        &self,
        actor: ActorId,
        id: CertificateId,
    ) -> ServiceResult<CertificateRecord> {
        let org = self.actor_org(actor)?;
        let record = self.owned_certificate(&org, id)?;
        if record.revoked {
            return Err(ServiceError::AlreadyRevoked { id: id.to_string() });
        }

        let tx = self.ledger.revoke(&record.fingerprint).await?;
        let updated = self.registry.mark_revoked(id, tx.as_str())?;
        info!(certificate = %id, "certificate revoked");
        Ok(updated)
    }

    /// Administratively delete a certificate row.
    ///
    /// Removes the local record and its indexes only; any anchored ledger
    /// entry and stored artifact remain.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids, `Authorization` across organizations
    pub fn delete(&self, actor: ActorId, id: CertificateId) -> ServiceResult<CertificateRecord> {
        let org = self.actor_org(actor)?;
        self.owned_certificate(&org, id)?;
        Ok(self.registry.delete_certificate(id)?)
    }

    /// All certificates issued by the actor's organization; an organization
    /// with no issuances gets an explicit empty collection.
    ///
    /// # Errors
    ///
    /// `Authorization` for unlinked actors
    pub fn list_certificates(&self, actor: ActorId) -> ServiceResult<Vec<CertificateRecord>> {
        let org = self.actor_org(actor)?;
        Ok(self.registry.certificates_for_org(org.id)?)
    }

    /// Create an issuing organization.
    ///
    /// # Errors
    ///
    /// `Conflict` on a name collision
    pub fn create_organization(
        &self,
        name: &str,
        wallet_address: Option<String>,
        domain: Option<String>,
    ) -> ServiceResult<OrgRecord> {
        CoreError::require_non_empty("name", name)?;
        Ok(self
            .registry
            .create_organization(name.trim(), wallet_address, domain)?)
    }

    /// Fetch an organization by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent
    pub fn organization(&self, org: OrgId) -> ServiceResult<OrgRecord> {
        Ok(self.registry.organization(org)?)
    }

    /// Link an authenticated actor to an organization.
    ///
    /// # Errors
    ///
    /// `NotFound` if the organization does not exist
    pub fn link_actor(&self, actor: ActorId, org: OrgId) -> ServiceResult<()> {
        Ok(self.registry.link_actor(actor, org)?)
    }

    fn actor_org(&self, actor: ActorId) -> ServiceResult<OrgRecord> {
        let org_id =
            self.registry
                .resolve_actor_org(actor)?
                .ok_or_else(|| ServiceError::Authorization {
                    reason: "actor is not linked to an organization".to_string(),
                })?;
        Ok(self.registry.organization(org_id)?)
    }

    fn owned_certificate(
        &self,
        org: &OrgRecord,
        id: CertificateId,
    ) -> ServiceResult<CertificateRecord> {
        let record = self
            .registry
            .certificate_by_id(id)?
            .ok_or_else(|| ServiceError::NotFound {
                what: format!("certificate {id}"),
            })?;
        if record.issued_by != org.id {
            return Err(ServiceError::Authorization {
                reason: "certificate belongs to another organization".to_string(),
            });
        }
        Ok(record)
    }
}
