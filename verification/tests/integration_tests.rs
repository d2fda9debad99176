//! End-to-end pipeline tests over the durable LMDB store.
//!
//! Collaborators are nullables; the store is the real backend, so these
//! tests cover the full action → judge → typed-patch → LMDB path, including
//! what survives a daemon restart.

use std::sync::Arc;

use attest_nullables::{
    NullDocumentAnalyzer, NullFaceComparator, NullLivenessService, NullObjectFetcher,
};
use attest_services::{DetectedFace, DocumentAnalysis, MatchCandidate};
use attest_store::{VerificationStage, VerificationStore};
use attest_store_lmdb::{LmdbEnvironment, LmdbVerificationStore};
use attest_types::{DocumentType, ImageKey, UserId, VerificationParams};
use attest_verification::{VerificationError, VerificationOrchestrator};

struct Pipeline {
    store: Arc<LmdbVerificationStore>,
    analyzer: Arc<NullDocumentAnalyzer>,
    liveness: Arc<NullLivenessService>,
    comparator: Arc<NullFaceComparator>,
    objects: Arc<NullObjectFetcher>,
    orchestrator: VerificationOrchestrator,
}

fn pipeline(dir: &std::path::Path) -> Pipeline {
    let environment = LmdbEnvironment::open_default(dir).expect("open env");
    let store = Arc::new(LmdbVerificationStore::new(&environment));
    let analyzer = Arc::new(NullDocumentAnalyzer::new());
    let liveness = Arc::new(NullLivenessService::new());
    let comparator = Arc::new(NullFaceComparator::new());
    let objects = Arc::new(NullObjectFetcher::new());
    let orchestrator = VerificationOrchestrator::new(
        VerificationParams::default(),
        store.clone(),
        analyzer.clone(),
        liveness.clone(),
        comparator.clone(),
        objects.clone(),
    );
    Pipeline {
        store,
        analyzer,
        liveness,
        comparator,
        objects,
        orchestrator,
    }
}

fn passport_analysis() -> DocumentAnalysis {
    DocumentAnalysis {
        lines: vec![
            "PASSPORT".to_string(),
            "Name: Jane Roe".to_string(),
            "Date of Birth: 1990-04-01".to_string(),
            "ID Number: X123456".to_string(),
        ],
        faces: vec![DetectedFace {
            brightness: 100.0,
            sharpness: 80.0,
        }],
    }
}

#[tokio::test]
async fn full_verification_flow_persists_through_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let p = pipeline(dir.path());
    let user = UserId::new("jane");
    let document_key = ImageKey::new("docs/jane/passport.jpg");

    // 1. Document upload processed and validated.
    p.analyzer.set_analysis(passport_analysis());
    let doc = p
        .orchestrator
        .process_document(&user, &document_key)
        .await
        .unwrap();
    assert!(doc.is_valid);
    assert_eq!(doc.document_type, DocumentType::Passport);

    // 2. Liveness session created (no store mutation yet).
    let session = p.orchestrator.start_liveness_session(&user).await.unwrap();
    let record = p.store.get(&user).unwrap().unwrap();
    assert_eq!(record.stage(), VerificationStage::DocumentValidated(true));

    // 3. Session scores 95, reference image matches the document at 91.
    p.liveness
        .set_result(95.0, Some(ImageKey::new("liveness/jane/ref.jpg")));
    p.objects.set_object(vec![0xFF, 0xD8, 0xFF]);
    p.comparator
        .set_candidates(vec![MatchCandidate { similarity: 91.0 }]);

    let outcome = p
        .orchestrator
        .verify_liveness(&user, &session.session_id)
        .await
        .unwrap();
    assert!(outcome.is_live);
    assert!(outcome.face_match);
    assert!(outcome.verification_completed);

    let record = p.store.get(&user).unwrap().unwrap();
    assert_eq!(record.stage(), VerificationStage::Complete);
    assert_eq!(record.liveness_confidence(), Some(95.0));
    assert_eq!(record.face_similarity(), Some(91.0));
}

#[tokio::test]
async fn completed_verification_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let user = UserId::new("jane");

    {
        let p = pipeline(dir.path());
        p.analyzer.set_analysis(passport_analysis());
        p.orchestrator
            .process_document(&user, &ImageKey::new("docs/jane/passport.jpg"))
            .await
            .unwrap();
        p.liveness
            .set_result(95.0, Some(ImageKey::new("liveness/jane/ref.jpg")));
        p.objects.set_object(vec![1, 2, 3]);
        p.comparator
            .set_candidates(vec![MatchCandidate { similarity: 91.0 }]);
        p.orchestrator
            .verify_liveness(&user, &attest_types::SessionId::new("s1"))
            .await
            .unwrap();
    }

    // A fresh environment over the same directory sees the completed record.
    let p = pipeline(dir.path());
    let record = p.orchestrator.record(&user).unwrap().unwrap();
    assert!(record.verification_completed);
    assert_eq!(record.stage(), VerificationStage::Complete);
}

#[tokio::test]
async fn document_retry_after_rejection_is_reflected() {
    let dir = tempfile::tempdir().unwrap();
    let p = pipeline(dir.path());
    let user = UserId::new("jane");

    // First attempt: blurry group photo, rejected.
    p.analyzer.set_analysis(DocumentAnalysis {
        lines: vec!["PASSPORT".to_string()],
        faces: vec![
            DetectedFace {
                brightness: 100.0,
                sharpness: 20.0,
            },
            DetectedFace {
                brightness: 90.0,
                sharpness: 60.0,
            },
        ],
    });
    let first = p
        .orchestrator
        .process_document(&user, &ImageKey::new("docs/jane/try1.jpg"))
        .await
        .unwrap();
    assert!(!first.is_valid);

    // Retry with a clean capture: the same record is updated in place.
    p.analyzer.set_analysis(passport_analysis());
    let second = p
        .orchestrator
        .process_document(&user, &ImageKey::new("docs/jane/try2.jpg"))
        .await
        .unwrap();
    assert!(second.is_valid);

    let record = p.store.get(&user).unwrap().unwrap();
    assert_eq!(
        record.document_key.as_ref().unwrap().as_str(),
        "docs/jane/try2.jpg"
    );
    assert_eq!(record.document_valid, Some(true));
    assert!(record.validation_errors.is_empty());
    assert_eq!(p.store.record_count().unwrap(), 1);
}

#[tokio::test]
async fn precondition_failure_makes_no_collaborator_calls() {
    let dir = tempfile::tempdir().unwrap();
    let p = pipeline(dir.path());

    let result = p
        .orchestrator
        .verify_liveness(&UserId::new("ghost"), &attest_types::SessionId::new("s1"))
        .await;
    assert!(matches!(
        result,
        Err(VerificationError::NoDocumentOnRecord(_))
    ));
    assert_eq!(p.comparator.call_count(), 0);
    assert_eq!(p.objects.call_count(), 0);
    // The record store was read but never written.
    assert_eq!(p.store.record_count().unwrap(), 0);
}
