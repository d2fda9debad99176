//! Nullable collaborators — programmable doubles for every external service.

use async_trait::async_trait;
use attest_services::{
    DocumentAnalysis, DocumentAnalyzer, FaceComparator, FaceImage, LivenessService,
    LivenessSession, LivenessSessionResult, MatchCandidate, ObjectFetcher, ServiceError,
};
use attest_types::{ImageKey, SessionId, SessionToken, UserId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A document analyzer that returns a programmed analysis, or fails once on
/// demand to simulate a collaborator outage.
pub struct NullDocumentAnalyzer {
    analysis: Mutex<DocumentAnalysis>,
    fail_next: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl NullDocumentAnalyzer {
    pub fn new() -> Self {
        Self {
            analysis: Mutex::new(DocumentAnalysis::default()),
            fail_next: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Program the analysis returned by subsequent calls.
    pub fn set_analysis(&self, analysis: DocumentAnalysis) {
        *self.analysis.lock().unwrap() = analysis;
    }

    /// Make the next call fail with a processing error.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullDocumentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentAnalyzer for NullDocumentAnalyzer {
    async fn analyze(&self, _key: &ImageKey) -> Result<DocumentAnalysis, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(ServiceError::RequestFailed(message));
        }
        Ok(self.analysis.lock().unwrap().clone())
    }
}

/// A liveness service issuing deterministic sessions and a programmable
/// session result.
pub struct NullLivenessService {
    result: Mutex<LivenessSessionResult>,
    last_audit_limit: Mutex<Option<u32>>,
    sessions_created: AtomicUsize,
}

impl NullLivenessService {
    pub fn new() -> Self {
        Self {
            result: Mutex::new(LivenessSessionResult::default()),
            last_audit_limit: Mutex::new(None),
            sessions_created: AtomicUsize::new(0),
        }
    }

    /// Program the session result: a confidence score and an optional
    /// reference image.
    pub fn set_result(&self, confidence: f64, reference_image: Option<ImageKey>) {
        *self.result.lock().unwrap() = LivenessSessionResult {
            confidence: Some(confidence),
            reference_image,
        };
    }

    /// Program a result with no usable confidence.
    pub fn set_result_absent(&self) {
        *self.result.lock().unwrap() = LivenessSessionResult::default();
    }

    /// The audit retention passed to the most recent `create_session`.
    pub fn last_audit_images_limit(&self) -> Option<u32> {
        *self.last_audit_limit.lock().unwrap()
    }

    pub fn sessions_created(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }
}

impl Default for NullLivenessService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LivenessService for NullLivenessService {
    async fn create_session(
        &self,
        user: &UserId,
        audit_images_limit: u32,
    ) -> Result<LivenessSession, ServiceError> {
        let n = self.sessions_created.fetch_add(1, Ordering::SeqCst);
        *self.last_audit_limit.lock().unwrap() = Some(audit_images_limit);
        Ok(LivenessSession {
            session_id: SessionId::new(format!("session-{user}-{n}")),
            session_token: SessionToken::new(format!("token-{user}-{n}")),
        })
    }

    async fn session_result(
        &self,
        _session_id: &SessionId,
    ) -> Result<LivenessSessionResult, ServiceError> {
        Ok(self.result.lock().unwrap().clone())
    }
}

/// A face comparator returning programmed candidates and counting calls.
pub struct NullFaceComparator {
    candidates: Mutex<Vec<MatchCandidate>>,
    calls: AtomicUsize,
}

impl NullFaceComparator {
    pub fn new() -> Self {
        Self {
            candidates: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_candidates(&self, candidates: Vec<MatchCandidate>) {
        *self.candidates.lock().unwrap() = candidates;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullFaceComparator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FaceComparator for NullFaceComparator {
    async fn compare(
        &self,
        _source: &FaceImage,
        _target: &FaceImage,
    ) -> Result<Vec<MatchCandidate>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.lock().unwrap().clone())
    }
}

/// An object fetcher serving one programmed blob for every key.
pub struct NullObjectFetcher {
    object: Mutex<Vec<u8>>,
    calls: AtomicUsize,
}

impl NullObjectFetcher {
    pub fn new() -> Self {
        Self {
            object: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_object(&self, bytes: Vec<u8>) {
        *self.object.lock().unwrap() = bytes;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullObjectFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectFetcher for NullObjectFetcher {
    async fn fetch(&self, _key: &ImageKey) -> Result<Vec<u8>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.object.lock().unwrap().clone())
    }
}
