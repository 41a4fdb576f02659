//! The review/approval workflow — a linear state machine over one in-memory
//! session. All real work happens in the remote service; the workflow owns
//! the session, enforces transitions, and translates failures into the one
//! user-visible message the session carries.
//!
//! Steps: `Welcome → Input → Processing → Review → Download`, with
//! `Review → Input` on reject and `Download → Welcome` on reset. Every
//! transition is user-triggered; nothing is automatic or timed.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::download::save_document;
use crate::models::{Change, KeywordAnalysis, ValidationResult};
use crate::service::TailorService;

const MSG_EMPTY_DESCRIPTION: &str = "Please enter a job description";
const MSG_GENERATE_FAILED: &str = "Failed to generate resume. Please try again.";
const MSG_VALIDATE_FAILED: &str =
    "Failed to validate resume. You can still download without validation.";
const MSG_DOWNLOAD_FAILED: &str = "Failed to download resume. Please try again.";

/// Where the session currently is in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Welcome,
    Input,
    Processing,
    Review,
    Download,
}

/// All mutable state for one tailoring session. Owned exclusively by the
/// workflow and reset together when a new session begins; nothing survives
/// process exit except the downloaded file.
#[derive(Debug)]
pub struct Session {
    pub step: Step,
    pub job_description: String,
    pub changes: Vec<Change>,
    pub resume_id: String,
    /// Opaque payload from the service, echoed back on validate/download.
    pub tailored_resume: Option<Value>,
    pub keyword_analysis: Option<KeywordAnalysis>,
    pub validation: Option<ValidationResult>,
    /// One outstanding call at a time; set while a request is in flight.
    pub busy: bool,
    pub error: Option<String>,
    pub saved_path: Option<PathBuf>,
}

impl Session {
    fn new() -> Self {
        Self {
            step: Step::Welcome,
            job_description: String::new(),
            changes: Vec::new(),
            resume_id: String::new(),
            tailored_resume: None,
            keyword_analysis: None,
            validation: None,
            busy: false,
            error: None,
            saved_path: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the session through the fixed step sequence, delegating all real
/// work to the `TailorService` collaborator.
pub struct Workflow {
    service: Arc<dyn TailorService>,
    display_name: String,
    output_dir: PathBuf,
    session: Session,
}

impl Workflow {
    pub fn new(service: Arc<dyn TailorService>, display_name: String, output_dir: PathBuf) -> Self {
        Self {
            service,
            display_name,
            output_dir,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `Welcome → Input`.
    pub fn start(&mut self) {
        if self.session.step == Step::Welcome {
            self.session.step = Step::Input;
        }
    }

    pub fn set_job_description(&mut self, text: String) {
        self.session.job_description = text;
    }

    /// Submits the job description: `Input → Processing`, one generate call,
    /// then `Review` on success or back to `Input` on failure. A blank
    /// description sets an error and leaves the step unchanged.
    pub async fn submit(&mut self) {
        if self.session.busy || self.session.step != Step::Input {
            return;
        }
        if self.session.job_description.trim().is_empty() {
            self.session.error = Some(MSG_EMPTY_DESCRIPTION.to_string());
            return;
        }

        self.session.busy = true;
        self.session.error = None;
        self.session.step = Step::Processing;

        match self.service.generate(&self.session.job_description).await {
            Ok(draft) => {
                info!(
                    "Tailored draft ready: {} changes, resume id '{}'",
                    draft.changes.len(),
                    draft.resume_id
                );
                self.session.changes = draft.changes;
                self.session.resume_id = draft.resume_id;
                self.session.tailored_resume = draft.tailored_resume;
                self.session.keyword_analysis = Some(draft.keyword_analysis);
                self.session.step = Step::Review;
            }
            Err(err) => {
                warn!("generate-resume failed: {err}");
                self.session.changes.clear();
                self.session.error = Some(MSG_GENERATE_FAILED.to_string());
                self.session.step = Step::Input;
            }
        }

        self.session.busy = false;
    }

    /// Runs the ATS validation over the current draft. Only available in
    /// `Review`; a failure is non-fatal and never blocks the download path.
    pub async fn validate(&mut self) {
        if self.session.busy || self.session.step != Step::Review {
            return;
        }

        self.session.busy = true;
        self.session.error = None;

        let missing = self
            .session
            .keyword_analysis
            .as_ref()
            .map(|k| k.keywords_missing.clone())
            .unwrap_or_default();

        match self
            .service
            .validate(self.session.tailored_resume.as_ref(), &missing)
            .await
        {
            Ok(result) => {
                info!("Validation score: {}", result.score);
                self.session.validation = Some(result);
            }
            Err(err) => {
                warn!("validate-resume failed: {err}");
                self.session.error = Some(MSG_VALIDATE_FAILED.to_string());
            }
        }

        self.session.busy = false;
    }

    /// Approves the draft: fetches the final document, saves it next to the
    /// configured output directory, and moves to `Download`. On any failure
    /// the session stays in `Review` with an error.
    pub async fn approve(&mut self) {
        if self.session.busy || self.session.step != Step::Review {
            return;
        }

        self.session.busy = true;
        self.session.error = None;

        let outcome = self
            .service
            .download(
                &self.session.resume_id,
                self.session.tailored_resume.as_ref(),
            )
            .await
            .and_then(|bytes| save_document(&bytes, &self.display_name, &self.output_dir));

        match outcome {
            Ok(path) => {
                self.session.saved_path = Some(path);
                self.session.step = Step::Download;
            }
            Err(err) => {
                warn!("download-resume failed: {err}");
                self.session.error = Some(MSG_DOWNLOAD_FAILED.to_string());
            }
        }

        self.session.busy = false;
    }

    /// Rejects the draft: discards changes, keyword analysis, and validation,
    /// and returns to `Input` with the job description intact.
    pub fn reject(&mut self) {
        if self.session.step != Step::Review {
            return;
        }
        self.session.changes.clear();
        self.session.keyword_analysis = None;
        self.session.validation = None;
        self.session.step = Step::Input;
    }

    /// Clears the whole session and returns to `Welcome`.
    pub fn reset(&mut self) {
        self.session = Session::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentError;
    use crate::models::TailoredDraft;
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scriptable stand-in for the remote service; counts calls so tests can
    /// assert "exactly one" semantics.
    #[derive(Default)]
    struct StubService {
        fail_generate: bool,
        fail_validate: bool,
        fail_download: bool,
        generate_calls: AtomicUsize,
        download_calls: AtomicUsize,
    }

    fn service_error() -> AgentError {
        AgentError::Api {
            status: 500,
            message: "boom".to_string(),
        }
    }

    #[async_trait]
    impl TailorService for StubService {
        async fn generate(&self, _job_description: &str) -> Result<TailoredDraft, AgentError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_generate {
                return Err(service_error());
            }
            Ok(TailoredDraft {
                changes: vec![Change {
                    section: "Summary".to_string(),
                    original: "Analyst".to_string(),
                    modified: "Senior financial analyst".to_string(),
                    reason: None,
                }],
                resume_id: "r-1".to_string(),
                tailored_resume: Some(json!({"summary": "tailored"})),
                keyword_analysis: KeywordAnalysis {
                    keywords_missing: vec!["sql".to_string()],
                    ..KeywordAnalysis::default()
                },
            })
        }

        async fn validate(
            &self,
            _tailored_resume: Option<&Value>,
            _missing_keywords: &[String],
        ) -> Result<ValidationResult, AgentError> {
            if self.fail_validate {
                return Err(service_error());
            }
            Ok(ValidationResult {
                score: 85,
                overall_assessment: "Looks good".to_string(),
                strengths: vec![],
                issues: vec![],
                ready_to_submit: true,
            })
        }

        async fn download(
            &self,
            _resume_id: &str,
            _tailored_resume: Option<&Value>,
        ) -> Result<Bytes, AgentError> {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_download {
                return Err(service_error());
            }
            Ok(Bytes::from_static(b"final-doc"))
        }
    }

    fn workflow_with(stub: StubService, output_dir: PathBuf) -> (Workflow, Arc<StubService>) {
        let stub = Arc::new(stub);
        let workflow = Workflow::new(stub.clone(), "Preeti".to_string(), output_dir);
        (workflow, stub)
    }

    async fn workflow_in_review(output_dir: PathBuf) -> (Workflow, Arc<StubService>) {
        let (mut workflow, stub) = workflow_with(StubService::default(), output_dir);
        workflow.start();
        workflow.set_job_description("Senior analyst role".to_string());
        workflow.submit().await;
        assert_eq!(workflow.session().step, Step::Review);
        (workflow, stub)
    }

    #[tokio::test]
    async fn empty_submit_stays_in_input_with_error() {
        let (mut workflow, stub) = workflow_with(StubService::default(), PathBuf::from("."));
        workflow.start();

        for text in ["", "   \n\t "] {
            workflow.set_job_description(text.to_string());
            workflow.submit().await;
            assert_eq!(workflow.session().step, Step::Input);
            assert!(workflow.session().error.is_some());
        }
        assert_eq!(stub.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_generate_reaches_review() {
        let (mut workflow, _stub) = workflow_with(StubService::default(), PathBuf::from("."));
        workflow.start();
        workflow.set_job_description("Senior analyst role".to_string());

        workflow.submit().await;

        let session = workflow.session();
        assert_eq!(session.step, Step::Review);
        assert_eq!(session.changes.len(), 1);
        assert_eq!(session.resume_id, "r-1");
        assert!(session.tailored_resume.is_some());
        assert!(session.keyword_analysis.is_some());
        assert!(session.error.is_none());
        assert!(!session.busy);
    }

    #[tokio::test]
    async fn failed_generate_returns_to_input_with_error() {
        let stub = StubService {
            fail_generate: true,
            ..StubService::default()
        };
        let (mut workflow, _stub) = workflow_with(stub, PathBuf::from("."));
        workflow.start();
        workflow.set_job_description("Senior analyst role".to_string());

        workflow.submit().await;

        let session = workflow.session();
        assert_eq!(session.step, Step::Input);
        assert!(!session.error.as_deref().unwrap_or("").is_empty());
        assert!(session.changes.is_empty());
        assert!(!session.busy);
    }

    #[tokio::test]
    async fn reject_preserves_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let (mut workflow, _stub) = workflow_in_review(dir.path().to_path_buf()).await;

        workflow.reject();

        let session = workflow.session();
        assert_eq!(session.step, Step::Input);
        assert_eq!(session.job_description, "Senior analyst role");
        assert!(session.changes.is_empty());
        assert!(session.keyword_analysis.is_none());
        assert!(session.validation.is_none());
    }

    #[tokio::test]
    async fn reset_restores_initial_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut workflow, _stub) = workflow_in_review(dir.path().to_path_buf()).await;
        workflow.validate().await;

        workflow.reset();

        let session = workflow.session();
        assert_eq!(session.step, Step::Welcome);
        assert!(session.job_description.is_empty());
        assert!(session.changes.is_empty());
        assert!(session.resume_id.is_empty());
        assert!(session.tailored_resume.is_none());
        assert!(session.keyword_analysis.is_none());
        assert!(session.validation.is_none());
        assert!(session.error.is_none());
        assert!(session.saved_path.is_none());
        assert!(!session.busy);
    }

    #[tokio::test]
    async fn approve_saves_exactly_one_file_and_reaches_download() {
        let dir = tempfile::tempdir().unwrap();
        let (mut workflow, stub) = workflow_in_review(dir.path().to_path_buf()).await;

        workflow.approve().await;

        let session = workflow.session();
        assert_eq!(session.step, Step::Download);
        assert_eq!(stub.download_calls.load(Ordering::SeqCst), 1);

        let saved = session.saved_path.as_ref().unwrap();
        assert_eq!(std::fs::read(saved).unwrap(), b"final-doc");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn failed_approve_stays_in_review() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubService {
            fail_download: true,
            ..StubService::default()
        };
        let (mut workflow, _stub) = workflow_with(stub, dir.path().to_path_buf());
        workflow.start();
        workflow.set_job_description("Senior analyst role".to_string());
        workflow.submit().await;

        workflow.approve().await;

        let session = workflow.session();
        assert_eq!(session.step, Step::Review);
        assert!(session.error.is_some());
        assert!(session.saved_path.is_none());
    }

    #[tokio::test]
    async fn failed_validate_is_nonfatal_and_download_still_works() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubService {
            fail_validate: true,
            ..StubService::default()
        };
        let (mut workflow, _stub) = workflow_with(stub, dir.path().to_path_buf());
        workflow.start();
        workflow.set_job_description("Senior analyst role".to_string());
        workflow.submit().await;

        workflow.validate().await;

        assert_eq!(workflow.session().step, Step::Review);
        assert!(workflow.session().validation.is_none());
        assert!(workflow.session().error.is_some());

        workflow.approve().await;
        assert_eq!(workflow.session().step, Step::Download);
    }

    #[tokio::test]
    async fn validate_stores_result_and_stays_in_review() {
        let dir = tempfile::tempdir().unwrap();
        let (mut workflow, _stub) = workflow_in_review(dir.path().to_path_buf()).await;

        workflow.validate().await;

        let session = workflow.session();
        assert_eq!(session.step, Step::Review);
        assert_eq!(session.validation.as_ref().unwrap().score, 85);
        assert!(session.error.is_none());
    }

    #[tokio::test]
    async fn busy_flag_blocks_a_second_submission() {
        let (mut workflow, stub) = workflow_with(StubService::default(), PathBuf::from("."));
        workflow.start();
        workflow.set_job_description("Senior analyst role".to_string());
        workflow.session.busy = true;

        workflow.submit().await;

        assert_eq!(workflow.session().step, Step::Input);
        assert_eq!(stub.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn validate_outside_review_is_ignored() {
        let (mut workflow, _stub) = workflow_with(StubService::default(), PathBuf::from("."));
        workflow.start();

        workflow.validate().await;

        assert_eq!(workflow.session().step, Step::Input);
        assert!(workflow.session().validation.is_none());
    }
}
