//! Resume service client — the single point of entry for all calls to the
//! remote tailoring API.
//!
//! ARCHITECTURAL RULE: no other module may talk HTTP. The workflow sees only
//! the `TailorService` trait, so tests can drive it with a stub.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AgentError;
use crate::models::{Change, KeywordAnalysis, TailoredDraft, ValidationResult};

/// Total-request deadline; without one a stalled server would hold the busy
/// flag forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// What the workflow needs from the remote service: one call per step of the
/// review flow. No call is retried automatically; the user resubmits.
#[async_trait]
pub trait TailorService: Send + Sync {
    /// Generates a tailored draft for the given job description.
    async fn generate(&self, job_description: &str) -> Result<TailoredDraft, AgentError>;

    /// Runs the ATS-style validation over a tailored draft.
    async fn validate(
        &self,
        tailored_resume: Option<&Value>,
        missing_keywords: &[String],
    ) -> Result<ValidationResult, AgentError>;

    /// Fetches the final document for an approved draft.
    async fn download(
        &self,
        resume_id: &str,
        tailored_resume: Option<&Value>,
    ) -> Result<Bytes, AgentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    job_description: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    changes: Vec<Change>,
    #[serde(rename = "resumeId", default)]
    resume_id: String,
    #[serde(rename = "tailoredResume")]
    tailored_resume: Option<Value>,
    #[serde(flatten)]
    keyword_analysis: KeywordAnalysis,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    #[serde(rename = "tailoredResume")]
    tailored_resume: Option<&'a Value>,
    missing_keywords: &'a [String],
}

#[derive(Debug, Serialize)]
struct DownloadRequest<'a> {
    #[serde(rename = "resumeId")]
    resume_id: &'a str,
    approved: bool,
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "tailoredResume")]
    tailored_resume: Option<&'a Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// `TailorService` backed by the hosted HTTP API.
#[derive(Clone)]
pub struct HttpTailorService {
    client: Client,
    base_url: String,
    user_id: String,
}

impl HttpTailorService {
    pub fn new(base_url: String, user_id: String) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        })
    }

    /// POSTs a JSON body to `/api/{path}` and returns the response after
    /// status triage. Non-success bodies are logged, not shown to the user.
    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, AgentError> {
        let url = format!("{}/api/{}", self.base_url, path);
        debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("{path} returned {status}: {message}");
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TailorService for HttpTailorService {
    async fn generate(&self, job_description: &str) -> Result<TailoredDraft, AgentError> {
        let request = GenerateRequest {
            job_description,
            user_id: &self.user_id,
        };

        let response: GenerateResponse =
            self.post("generate-resume", &request).await?.json().await?;

        debug!(
            "generate-resume: {} changes, {} found / {} addressed / {} missing keywords",
            response.changes.len(),
            response.keyword_analysis.keywords_found.len(),
            response.keyword_analysis.keywords_addressed.len(),
            response.keyword_analysis.keywords_missing.len()
        );

        Ok(TailoredDraft {
            changes: response.changes,
            resume_id: response.resume_id,
            tailored_resume: response.tailored_resume,
            keyword_analysis: response.keyword_analysis,
        })
    }

    async fn validate(
        &self,
        tailored_resume: Option<&Value>,
        missing_keywords: &[String],
    ) -> Result<ValidationResult, AgentError> {
        let request = ValidateRequest {
            tailored_resume,
            missing_keywords,
        };

        let result = self
            .post("validate-resume", &request)
            .await?
            .json::<ValidationResult>()
            .await?;

        Ok(result)
    }

    async fn download(
        &self,
        resume_id: &str,
        tailored_resume: Option<&Value>,
    ) -> Result<Bytes, AgentError> {
        let request = DownloadRequest {
            resume_id,
            approved: true,
            user_id: &self.user_id,
            tailored_resume,
        };

        let bytes = self
            .post("download-resume", &request)
            .await?
            .bytes()
            .await?;

        Ok(bytes)
    }
}
