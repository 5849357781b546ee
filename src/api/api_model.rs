use serde::{Deserialize, Serialize};

use crate::detect::signup_detector::SignupAssessment;
use crate::orchestrator::batch::{AttemptResult, BatchResult};

pub const MIN_ACCOUNTS: i64 = 2;
pub const MAX_ACCOUNTS: i64 = 7;

pub const MSG_SIGNUP_DETECTED: &str = "Signup form detected! Ready to create accounts.";
pub const MSG_NO_SIGNUP: &str =
    "No signup form detected. This site may not support automated registration.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub can_create: bool,
    /// `None` only when the page could not be loaded.
    pub details: Option<SignupAssessment>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub success: bool,
    pub total_created: usize,
    pub total_failed: usize,
    pub accounts: Vec<AttemptResult>,
}

impl From<BatchResult> for CreateResponse {
    fn from(batch: BatchResult) -> Self {
        Self {
            success: true,
            total_created: batch.success_count,
            total_failed: batch.failure_count,
            accounts: batch.attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
