//! Verification reconciler scenarios.

mod common;

use certanchor_core::Fingerprint;
use certanchor_store::Locator;

#[tokio::test]
async fn test_issue_then_verify_round_trip() {
    let fx = common::service();
    let (actor, org_id) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();

    let verdict = fx.service.verify(issued.record.fingerprint).await.unwrap();
    let record = verdict.local_record.unwrap();
    assert_eq!(record.id, issued.record.id);
    assert_eq!(record.issued_by, org_id);

    let state = verdict.on_chain.state().unwrap();
    assert!(state.exists);
    assert!(!state.revoked);
    assert!(verdict.pdf_url.is_some());
}

#[tokio::test]
async fn test_verification_is_idempotent() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();

    let first = fx.service.verify(issued.record.fingerprint).await.unwrap();
    let second = fx.service.verify(issued.record.fingerprint).await.unwrap();
    assert_eq!(first.local_record, second.local_record);
    assert_eq!(first.pdf_url, second.pdf_url);

    // Reads leave the record untouched.
    let records = fx.service.list_certificates(actor).unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].revoked);
}

#[tokio::test]
async fn test_unknown_fingerprint_reports_absence() {
    let fx = common::service();
    let verdict = fx
        .service
        .verify(Fingerprint::compute(b"never issued"))
        .await
        .unwrap();
    assert!(verdict.local_record.is_none());
    assert!(verdict.pdf_url.is_none());
}

#[tokio::test]
async fn test_verify_bytes_equivalent_to_fingerprint_path() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();

    // Recover the stored artifact bytes through the local store layout.
    let locator: Locator = issued.record.artifact_locator.parse().unwrap();
    let path = fx.storage_root.join("certs").join(locator.object_name());
    let bytes = std::fs::read(path).unwrap();

    let by_bytes = fx.service.verify_bytes(&bytes).await.unwrap();
    let matched = by_bytes.local_record.unwrap();
    assert_eq!(matched.id, issued.record.id);
    // The verdict is keyed by the canonical fingerprint, not the content hash.
    assert_eq!(by_bytes.fingerprint, issued.record.fingerprint);
    assert_ne!(
        Fingerprint::compute(&bytes),
        issued.record.fingerprint
    );
    assert!(by_bytes.pdf_url.is_some());
}

#[tokio::test]
async fn test_verify_bytes_unknown_content_falls_through() {
    let fx = common::service();
    let bytes = b"not an issued artifact";
    let verdict = fx.service.verify_bytes(bytes).await.unwrap();

    assert!(verdict.local_record.is_none());
    assert!(verdict.pdf_url.is_none());
    assert_eq!(verdict.fingerprint, Fingerprint::compute(bytes));
}

#[tokio::test]
async fn test_revoked_certificate_verdict() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();
    fx.service.revoke(actor, issued.record.id).await.unwrap();

    let verdict = fx.service.verify(issued.record.fingerprint).await.unwrap();
    let record = verdict.local_record.unwrap();
    assert!(record.revoked);
    assert!(record.revocation_tx_ref.is_some());
}

#[tokio::test]
async fn test_verdict_wire_shape() {
    let fx = common::service();
    let (actor, _) = common::seeded_actor(&fx.service, "Test University");
    let issued = fx.service.issue(actor, "Ada", "Engines").await.unwrap();

    let verdict = fx.service.verify(issued.record.fingerprint).await.unwrap();
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(
        json["fingerprint"].as_str().unwrap(),
        issued.record.fingerprint.to_hex()
    );
    assert!(json["local_record"]["owner_name"].is_string());
    assert_eq!(json["on_chain"]["exists"], true);
    assert!(json["pdf_url"].is_string());
}
