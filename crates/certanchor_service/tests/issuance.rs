//! Issuance pipeline scenarios against the mock ledger and a local-only
//! artifact store.

mod common;

use certanchor_core::ActorId;
use certanchor_ledger::MOCK_TX_REF;
use certanchor_service::ServiceError;

#[tokio::test]
async fn test_issue_persists_full_record() {
    let fx = common::service();
    let (actor, org_id) = common::seeded_actor(&fx.service, "Test University");

    let issued = fx
        .service
        .issue(actor, "Ada Lovelace", "Analytical Engines")
        .await
        .unwrap();

    assert_eq!(issued.record.owner_name, "Ada Lovelace");
    assert_eq!(issued.record.course_name, "Analytical Engines");
    assert_eq!(issued.record.issued_by, org_id);
    assert!(!issued.record.revoked);
    assert!(issued.record.content_hash.is_some());
    assert!(issued.record.artifact_locator.starts_with("local:"));
}

#[tokio::test]
async fn test_issue_without_ledger_uses_sentinel() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");

    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();
    assert_eq!(issued.record.tx_ref.as_deref(), Some(MOCK_TX_REF));
}

#[tokio::test]
async fn test_issue_degraded_store_yields_static_url() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");

    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();
    let url = issued.pdf_url.unwrap();
    assert!(url.starts_with("http://localhost:8080/storage/certs/certificates/"));
    assert!(url.ends_with(".pdf"));
}

#[tokio::test]
async fn test_same_day_duplicate_is_conflict() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");

    fx.service.issue(actor, "Ada", "Engines").await.unwrap();
    let err = fx.service.issue(actor, "Ada", "Engines").await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict { .. }));

    // The surviving record is the first one.
    let records = fx.service.list_certificates(actor).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_issue_rejects_empty_fields() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");

    let err = fx.service.issue(actor, "", "Engines").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    let err = fx.service.issue(actor, "Ada", "   ").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_issue_requires_linked_actor() {
    let fx = common::service();
    let err = fx
        .service
        .issue(ActorId::new(), "Ada", "Engines")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization { .. }));
}

#[tokio::test]
async fn test_require_offsite_blocks_local_fallback() {
    let fx = common::service_with(true);
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");

    let err = fx.service.issue(actor, "Ada", "Engines").await.unwrap_err();
    assert!(matches!(err, ServiceError::OffsiteStorage { .. }));
    assert!(fx.service.list_certificates(actor).unwrap().is_empty());
}

#[tokio::test]
async fn test_revoke_flips_flag_once() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();
    assert_eq!(fx.ledger.submissions(), 1);

    let revoked = fx.service.revoke(actor, issued.record.id).await.unwrap();
    assert!(revoked.revoked);
    assert_eq!(revoked.revocation_tx_ref.as_deref(), Some(MOCK_TX_REF));
    assert_eq!(fx.ledger.submissions(), 2);

    let err = fx.service.revoke(actor, issued.record.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyRevoked { .. }));
    // The repeated revoke was refused locally, before any ledger call.
    assert_eq!(fx.ledger.submissions(), 2);
}

#[tokio::test]
async fn test_cross_org_revoke_rejected() {
    let fx = common::service();
    let (issuer, _) = common::seeded_actor(&fx.service, "Org A");
    let (outsider, _) = common::seeded_actor(&fx.service, "Org B");
    let issued = fx.service.issue(issuer, "Ada", "Engines").await.unwrap();

    let err = fx.service.revoke(outsider, issued.record.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization { .. }));

    // Still revocable by the issuing org.
    assert!(fx.service.revoke(issuer, issued.record.id).await.is_ok());
}

#[tokio::test]
async fn test_revoke_unknown_certificate() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let err = fx
        .service
        .revoke(actor, certanchor_core::CertificateId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_removes_row_only() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();

    fx.service.delete(actor, issued.record.id).unwrap();
    assert!(fx.service.list_certificates(actor).unwrap().is_empty());

    // The verdict now reports local absence for that fingerprint.
    let verdict = fx.service.verify(issued.record.fingerprint).await.unwrap();
    assert!(verdict.local_record.is_none());
}

#[tokio::test]
async fn test_cross_org_delete_rejected() {
    let fx = common::service();
    let (issuer, _) = common::seeded_actor(&fx.service, "Org A");
    let (outsider, _) = common::seeded_actor(&fx.service, "Org B");
    let issued = fx.service.issue(issuer, "Ada", "Engines").await.unwrap();

    let err = fx.service.delete(outsider, issued.record.id).unwrap_err();
    assert!(matches!(err, ServiceError::Authorization { .. }));
}

#[tokio::test]
async fn test_org_listing_is_scoped() {
    let fx = common::service();
    let (a, _) = common::seeded_actor(&fx.service, "Org A");
    let (b, _) = common::seeded_actor(&fx.service, "Org B");

    fx.service.issue(a, "Ada", "Engines").await.unwrap();
    fx.service.issue(a, "Grace", "Compilers").await.unwrap();
    fx.service.issue(b, "Alan", "Computability").await.unwrap();

    assert_eq!(fx.service.list_certificates(a).unwrap().len(), 2);
    assert_eq!(fx.service.list_certificates(b).unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_org_name_is_conflict() {
    let fx = common::service();
    fx.service.create_organization("Org A", None, None).unwrap();
    let err = fx
        .service
        .create_organization("Org A", None, None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict { .. }));
}
