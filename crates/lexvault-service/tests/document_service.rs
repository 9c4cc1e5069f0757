mod common;

use std::sync::Arc;

use lexvault_core::ErrorKind;
use lexvault_core::events::AuditAction;
use lexvault_core::types::ClientId;
use lexvault_entity::user::UserRole;
use lexvault_storage::ScanImage;

use common::{FailingAuditSink, Harness, context, png};

#[tokio::test]
async fn test_new_client_lists_configured_folders() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::new(tmp.path()).await;

    let listing = h
        .service
        .list_folders(&context(UserRole::User), h.client_id)
        .await
        .unwrap();

    let mut expected = h.store.config().client_subfolders.clone();
    expected.sort();
    assert_eq!(listing.folders, expected);
}

#[tokio::test]
async fn test_unknown_client_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::new(tmp.path()).await;
    let ctx = context(UserRole::Manager);

    let err = h
        .service
        .list_files(&ctx, ClientId::new(), "Correspondence")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    assert_eq!(err.message, "Client not found");
}

#[tokio::test]
async fn test_upload_versions_and_audits() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::new(tmp.path()).await;
    let ctx = context(UserRole::User);

    let first = h
        .service
        .upload(&ctx, h.client_id, "Contracts", "Lease.docx", b"first draft")
        .await
        .unwrap();
    let second = h
        .service
        .upload(&ctx, h.client_id, "Contracts", "Lease.docx", b"second draft")
        .await
        .unwrap();

    assert_eq!(first.stored_as, "Lease.docx");
    assert_eq!(second.stored_as, "Lease_v2.docx");

    let files = h
        .service
        .list_files(&ctx, h.client_id, "Contracts")
        .await
        .unwrap()
        .files;
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Lease.docx", "Lease_v2.docx"]);

    let events = h.audit.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.action == AuditAction::UploadFile));
    assert_eq!(events[1].actor, ctx.user_id);
    assert_eq!(events[1].details.as_ref().unwrap()["storedAs"], "Lease_v2.docx");
    assert_eq!(events[1].ip_address.as_deref(), Some("10.0.0.7"));
}

#[tokio::test]
async fn test_rejected_upload_is_audited_as_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::new(tmp.path()).await;

    let err = h
        .service
        .upload(&context(UserRole::User), h.client_id, "..", "escape.txt", b"x")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidInput));

    let events = h.audit.events();
    assert_eq!(events.len(), 1);
    let details = events[0].details.as_ref().unwrap();
    assert_eq!(details["success"], false);
    assert!(details["error"].as_str().unwrap().starts_with("INVALID_INPUT"));
}

#[tokio::test]
async fn test_scan_produces_pdf_and_keeps_originals() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::new(tmp.path()).await;
    let ctx = context(UserRole::User);

    let images = vec![
        ScanImage::new("page1.png", png(40, 60)),
        ScanImage::new("page2.png", png(60, 40)),
    ];
    let receipt = h
        .service
        .scan(&ctx, h.client_id, "Court Filings", images, None)
        .await
        .unwrap();

    assert_eq!(receipt.pdf, "ScannedDocument.pdf");
    assert_eq!(receipt.originals, ["page1.png", "page2.png"]);

    let pdf = h
        .service
        .download(&ctx, h.client_id, "Court Filings", &receipt.pdf)
        .await
        .unwrap();
    assert_eq!(pdf.content_type, "application/pdf");
    assert!(pdf.bytes.starts_with(b"%PDF"));

    let second = h
        .service
        .scan(
            &ctx,
            h.client_id,
            "Court Filings",
            vec![ScanImage::new("page1.png", png(10, 10))],
            Some(false),
        )
        .await
        .unwrap();
    assert_eq!(second.pdf, "ScannedDocument_v2.pdf");
    assert!(second.originals.is_empty());

    let events = h.audit.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.action == AuditAction::ScanDocument));
}

#[tokio::test]
async fn test_rename_and_search() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::new(tmp.path()).await;
    let ctx = context(UserRole::Manager);

    h.service
        .upload(&ctx, h.client_id, "Evidence", "IMG_0042.jpg", b"jpeg")
        .await
        .unwrap();
    let renamed = h
        .service
        .rename(&ctx, h.client_id, "Evidence", "IMG_0042.jpg", "Exhibit A")
        .await
        .unwrap();
    assert_eq!(renamed.final_name, "Exhibit A.jpg");

    let hits = h
        .service
        .search(&ctx, h.client_id, "exhibit")
        .await
        .unwrap()
        .results;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].folder, "Evidence");
    assert_eq!(hits[0].name, "Exhibit A.jpg");

    let err = h
        .service
        .rename(&ctx, h.client_id, "Evidence", "IMG_0042.jpg", "Exhibit B")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    let actions: Vec<_> = h.audit.events().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        [
            AuditAction::UploadFile,
            AuditAction::RenameFile,
            AuditAction::RenameFile
        ]
    );
}

#[tokio::test]
async fn test_failing_audit_sink_does_not_fail_the_operation() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Harness::with_sink(tmp.path(), Some(Arc::new(FailingAuditSink))).await;

    let receipt = h
        .service
        .upload(
            &context(UserRole::User),
            h.client_id,
            "Correspondence",
            "letter.pdf",
            b"%PDF-1.5",
        )
        .await
        .unwrap();
    assert_eq!(receipt.stored_as, "letter.pdf");
    assert!(h.client_root.join("Correspondence/letter.pdf").is_file());
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_names() {
    let tmp = tempfile::tempdir().unwrap();
    let h = Arc::new(Harness::new(tmp.path()).await);

    let mut handles = Vec::new();
    for i in 0..8 {
        let h = h.clone();
        handles.push(tokio::spawn(async move {
            h.service
                .upload(
                    &context(UserRole::User),
                    h.client_id,
                    "Contracts",
                    "NDA.pdf",
                    format!("copy {i}").as_bytes(),
                )
                .await
                .unwrap()
                .stored_as
        }));
    }

    let mut names = Vec::new();
    for handle in handles {
        names.push(handle.await.unwrap());
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 8);
    assert!(names.contains(&"NDA.pdf".to_string()));
    assert!(names.contains(&"NDA_v8.pdf".to_string()));
}
