use serde::Serialize;
use chrono::Utc;

use crate::orchestrator::batch::{AttemptOutcome, AttemptResult};

/// One line of the attempt trace file.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: i64,
    pub url: String,
    pub attempt: u32,

    pub status: &'static str,

    pub username: Option<String>,
    pub submit_clicked: Option<bool>,
    pub reason: Option<String>,
}

impl TraceEvent {
    pub fn for_attempt(url: &str, result: &AttemptResult) -> Self {
        let mut event = Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            url: url.to_string(),
            attempt: result.attempt_index,
            status: "success",
            username: None,
            submit_clicked: None,
            reason: None,
        };

        match &result.outcome {
            AttemptOutcome::Success { credentials, submit_clicked } => {
                // Passwords stay out of the trace
                event.username = Some(credentials.username.clone());
                event.submit_clicked = Some(*submit_clicked);
            }
            AttemptOutcome::Failure { reason } => {
                event.status = "failure";
                event.reason = Some(reason.clone());
            }
        }

        event
    }
}
