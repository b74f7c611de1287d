//! Shared fixture: a full service over a temp directory, with the mock
//! ledger and a local-only artifact store.

#![allow(dead_code)]

use certanchor_core::{ActorId, OrgId};
use certanchor_ledger::{LedgerAdapter, MockLedger};
use certanchor_registry::Registry;
use certanchor_render::CertificateRenderer;
use certanchor_service::{CertService, ServiceConfig};
use certanchor_store::{ArtifactStore, LocalConfig};

pub struct Fixture {
    pub service: CertService,
    /// Handle onto the mock ledger inside the service, for submission counts
    pub ledger: MockLedger,
    pub storage_root: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

pub fn service() -> Fixture {
    service_with(false)
}

pub fn service_with(require_offsite: bool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let storage_root = dir.path().join("storage");
    let registry = Registry::open(&dir.path().join("registry.redb")).unwrap();
    let renderer = CertificateRenderer::new(dir.path().join("staging")).unwrap();
    let store = ArtifactStore::local_only(LocalConfig {
        root: storage_root.clone(),
        bucket: "certs".to_string(),
        public_base: "http://localhost:8080".to_string(),
    })
    .unwrap();
    let ledger = MockLedger::new();
    let service = CertService::new(
        registry,
        renderer,
        store,
        LedgerAdapter::Degraded(ledger.clone()),
        ServiceConfig {
            frontend_base: "http://localhost:3000".to_string(),
            require_offsite,
        },
    );
    Fixture {
        service,
        ledger,
        storage_root,
        _dir: dir,
    }
}

pub fn seeded_actor(service: &CertService, org_name: &str) -> (ActorId, OrgId) {
    let org = service.create_organization(org_name, None, None).unwrap();
    let actor = ActorId::new();
    service.link_actor(actor, org.id).unwrap();
    (actor, org.id)
}
