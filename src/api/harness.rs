use tracing::{info, warn};
use url::Url;

use crate::api::api_model::{
    AnalyzeRequest, AnalyzeResponse, CreateRequest, CreateResponse, MAX_ACCOUNTS, MIN_ACCOUNTS,
    MSG_NO_SIGNUP, MSG_SIGNUP_DETECTED,
};
use crate::browser::session::{PageGuard, ProviderGuard, ProviderLauncher};
use crate::detect::signup_detector::{LinkTieBreak, SignupAssessment, assess};
use crate::error::HarnessError;
use crate::identity::generator::{FakeIdentitySource, IdentityProfile};
use crate::identity::identity_model::IdentitySource;
use crate::orchestrator::batch::{OrchestratorConfig, create_accounts};
use crate::orchestrator::pacing::PacingPolicy;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Hosts the operator is authorized to run Create against.
///
/// A listed host also admits its subdomains. An empty list admits nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetPolicy {
    pub allowed_hosts: Vec<String>,
}

impl TargetPolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_hosts: hosts
                .into_iter()
                .map(|h| {
                    let h: String = h.into();
                    h.trim().trim_end_matches('.').to_lowercase()
                })
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn check(&self, url: &str) -> Result<(), HarnessError> {
        let parsed = Url::parse(url)
            .map_err(|e| HarnessError::InvalidRequest(format!("Invalid URL '{}': {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| HarnessError::InvalidRequest(format!("URL '{}' has no host", url)))?
            .to_lowercase();

        let allowed = self
            .allowed_hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{}", h)));

        if allowed {
            Ok(())
        } else {
            Err(HarnessError::TargetNotAllowed(host))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HarnessSettings {
    pub orchestrator: OrchestratorConfig,
    pub tie_break: LinkTieBreak,
    pub targets: TargetPolicy,
}

/// Entry point for the Analyze and Create operations.
pub struct SignupHarness {
    launcher: Box<dyn ProviderLauncher>,
    identities: Box<dyn IdentitySource>,
    pacing: PacingPolicy,
    settings: HarnessSettings,
    tracer: TraceLogger,
}

impl SignupHarness {
    pub fn new(launcher: Box<dyn ProviderLauncher>, settings: HarnessSettings) -> Self {
        Self {
            launcher,
            identities: Box::new(FakeIdentitySource::new(IdentityProfile::default())),
            pacing: PacingPolicy::default(),
            settings,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_identities(mut self, identities: Box<dyn IdentitySource>) -> Self {
        self.identities = identities;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Load `url` once and report whether it offers a signup path.
    ///
    /// Only a missing URL is an error; load failures come back as
    /// `can_create = false` with the reason in `message`.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, HarnessError> {
        let url = required(request.url.as_deref(), "URL is required")?;

        match self.assess_url(url) {
            Ok(assessment) => {
                let can_create = assessment.can_create();
                info!(url, can_create, forms = assessment.form_count, "analysis complete");
                Ok(AnalyzeResponse {
                    can_create,
                    details: Some(assessment),
                    message: if can_create { MSG_SIGNUP_DETECTED } else { MSG_NO_SIGNUP }.to_string(),
                })
            }
            Err(e) => {
                warn!(url, error = %e, "analysis failed");
                Ok(AnalyzeResponse {
                    can_create: false,
                    details: None,
                    message: format!("Error analyzing site: {}", e),
                })
            }
        }
    }

    fn assess_url(&self, url: &str) -> Result<SignupAssessment, HarnessError> {
        let mut provider = ProviderGuard::new(self.launcher.launch()?);
        let mut page = PageGuard::open(provider.provider())?;
        let inventory = page.navigate(url, self.settings.orchestrator.navigation_timeout)?;
        Ok(assess(&inventory, self.settings.tie_break))
    }

    /// Run a batch of signup attempts against `url`.
    ///
    /// The request is validated completely before any browser is launched.
    pub fn create(&mut self, request: &CreateRequest) -> Result<CreateResponse, HarnessError> {
        let (url, count) = match (request.url.as_deref(), request.count) {
            (Some(url), Some(count)) if !url.trim().is_empty() => (url.trim(), count),
            _ => return Err(HarnessError::InvalidRequest("URL and count are required".into())),
        };
        if !(MIN_ACCOUNTS..=MAX_ACCOUNTS).contains(&count) {
            return Err(HarnessError::InvalidRequest(format!(
                "Count must be between {} and {}",
                MIN_ACCOUNTS, MAX_ACCOUNTS
            )));
        }
        self.settings.targets.check(url)?;

        let launched = self.launcher.launch().map_err(HarnessError::into_acquisition)?;
        let mut provider = ProviderGuard::new(launched);

        info!(url, count, "starting batch");
        let batch = create_accounts(
            provider.provider(),
            self.identities.as_mut(),
            &mut self.pacing,
            &self.settings.orchestrator,
            url,
            count as u32,
        )?;

        for attempt in &batch.attempts {
            self.tracer.log(&TraceEvent::for_attempt(url, attempt));
        }

        Ok(CreateResponse::from(batch))
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, HarnessError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(HarnessError::InvalidRequest(message.to_string())),
    }
}
