//! Wire and display models for the resume-tailoring service.
//!
//! Every field the service may omit carries a serde default so a sparse
//! response never fails deserialization; the canonical contract is
//! "everything optional on the wire, defaulted locally".

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One proposed edit between the original and the tailored resume text.
/// Immutable once received; the ordered list has no uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub modified: String,
    pub reason: Option<String>,
}

/// Keyword/ATS analysis returned alongside a tailored draft.
/// Purely display data; no derived invariants are enforced locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    #[serde(default)]
    pub keywords_found: Vec<String>,
    #[serde(default)]
    pub keywords_addressed: Vec<String>,
    #[serde(default)]
    pub keywords_missing: Vec<String>,
    #[serde(default = "default_estimated_pages")]
    pub estimated_pages: u32,
}

fn default_estimated_pages() -> u32 {
    2
}

impl Default for KeywordAnalysis {
    fn default() -> Self {
        Self {
            keywords_found: Vec::new(),
            keywords_addressed: Vec::new(),
            keywords_missing: Vec::new(),
            estimated_pages: default_estimated_pages(),
        }
    }
}

/// Everything a successful generate call yields: the proposed edits, an
/// opaque resume identifier, the tailored payload echoed back on later
/// calls, and the keyword analysis.
#[derive(Debug, Clone)]
pub struct TailoredDraft {
    pub changes: Vec<Change>,
    pub resume_id: String,
    pub tailored_resume: Option<Value>,
    pub keyword_analysis: KeywordAnalysis,
}

/// Issue severity in a validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// A single problem the validator found in the tailored resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub suggestion: Option<String>,
}

/// ATS-style validation report for a tailored resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// 0–100 estimate of how well the document passes automated screening.
    pub score: u8,
    #[serde(default)]
    pub overall_assessment: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
    #[serde(default)]
    pub ready_to_submit: bool,
}
