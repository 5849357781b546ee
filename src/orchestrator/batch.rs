use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::browser::session::{BrowsingProvider, PageGuard};
use crate::detect::field_classifier::plan_fill;
use crate::detect::submit_detector::find_submit;
use crate::error::HarnessError;
use crate::identity::identity_model::{IdentitySource, IdentitySummary, SyntheticIdentity};
use crate::orchestrator::pacing::PacingPolicy;

/// What to record when the filled page offers no submit control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// A filled form counts as success; there is no way to confirm acceptance anyway.
    #[default]
    RecordSuccess,
    RecordFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub navigation_timeout: Duration,
    pub settle: Duration,
    pub submit_wait: Duration,
    pub submit_policy: SubmitPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle: Duration::from_secs(1),
            submit_wait: Duration::from_secs(3),
            submit_policy: SubmitPolicy::RecordSuccess,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AttemptOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        credentials: IdentitySummary,
        submit_clicked: bool,
    },
    Failure { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub attempt_index: u32,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub attempts: Vec<AttemptResult>,
}

impl BatchResult {
    fn from_attempts(attempts: Vec<AttemptResult>) -> Self {
        let success_count = attempts.iter().filter(|a| a.is_success()).count();
        Self {
            success_count,
            failure_count: attempts.len() - success_count,
            attempts,
        }
    }
}

/// Run `count` independent attempts against `url`, one after another.
///
/// Per-attempt errors become `Failure` entries; only a failure to open a page
/// aborts the batch. The provider itself is not shut down here.
pub fn create_accounts<P: BrowsingProvider + ?Sized>(
    provider: &mut P,
    identities: &mut dyn IdentitySource,
    pacing: &mut PacingPolicy,
    config: &OrchestratorConfig,
    url: &str,
    count: u32,
) -> Result<BatchResult, HarnessError> {
    let mut attempts = Vec::with_capacity(count as usize);

    for attempt_index in 1..=count {
        let outcome = run_attempt(provider, identities, config, url)?;

        match &outcome {
            AttemptOutcome::Success { submit_clicked, .. } => {
                info!(attempt = attempt_index, submit_clicked, "attempt succeeded")
            }
            AttemptOutcome::Failure { reason } => {
                warn!(attempt = attempt_index, %reason, "attempt failed")
            }
        }
        attempts.push(AttemptResult { attempt_index, outcome });

        if attempt_index < count {
            let delay = pacing.pause();
            debug!(delay_ms = delay.as_millis() as u64, "paced before next attempt");
        }
    }

    let batch = BatchResult::from_attempts(attempts);
    info!(
        url,
        succeeded = batch.success_count,
        failed = batch.failure_count,
        "batch complete"
    );
    Ok(batch)
}

fn run_attempt<P: BrowsingProvider + ?Sized>(
    provider: &mut P,
    identities: &mut dyn IdentitySource,
    config: &OrchestratorConfig,
    url: &str,
) -> Result<AttemptOutcome, HarnessError> {
    let mut page = PageGuard::open(provider)
        .map_err(HarnessError::into_acquisition)?;
    let identity = identities.generate();

    let outcome = match fill_and_submit(&mut page, &identity, config, url) {
        Ok(true) => success(&identity, true),
        Ok(false) => match config.submit_policy {
            SubmitPolicy::RecordSuccess => success(&identity, false),
            SubmitPolicy::RecordFailure => AttemptOutcome::Failure {
                reason: "No submit control found on page".into(),
            },
        },
        Err(e) => AttemptOutcome::Failure { reason: e.to_string() },
    };

    // page closes on drop
    Ok(outcome)
}

fn success(identity: &SyntheticIdentity, submit_clicked: bool) -> AttemptOutcome {
    AttemptOutcome::Success {
        credentials: identity.summary(),
        submit_clicked,
    }
}

/// Returns whether a submit control was clicked.
fn fill_and_submit<P: BrowsingProvider + ?Sized>(
    page: &mut PageGuard<'_, P>,
    identity: &SyntheticIdentity,
    config: &OrchestratorConfig,
    url: &str,
) -> Result<bool, HarnessError> {
    page.navigate(url, config.navigation_timeout)?;

    // Forms may render after load, so classify what is live now
    let live = page.inventory()?;
    let plan = plan_fill(&live, identity);
    debug!(page = page.id().0, fields = plan.len(), "filling inputs");
    if !plan.is_empty() {
        page.set_values(&plan)?;
    }

    page.wait(config.settle)?;

    let live = page.inventory()?;
    let Some(submit) = find_submit(&live.actions) else {
        debug!(page = page.id().0, "no submit control found");
        return Ok(false);
    };

    page.click(submit.index)?;
    page.wait(config.submit_wait)?;
    Ok(true)
}
