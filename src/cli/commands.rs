use serde::Serialize;

use crate::api::api_model::{AnalyzeRequest, CreateRequest, ErrorResponse};
use crate::api::harness::SignupHarness;
use crate::browser::bridge::NodeBridgeLauncher;
use crate::cli::config::{AppConfig, build_pacing, build_harness_settings};
use crate::error::HarnessError;
use crate::identity::generator::FakeIdentitySource;
use crate::trace::logger::TraceLogger;

fn launcher(config: &AppConfig, bridge_script: Option<&str>) -> NodeBridgeLauncher {
    NodeBridgeLauncher {
        script: bridge_script
            .map(str::to_string)
            .unwrap_or_else(|| config.browser.script.clone()),
        user_agent: config.browser.user_agent.clone(),
    }
}

// ============================================================================
// analyze subcommand
// ============================================================================

/// Print the analysis payload. Returns false only for a rejected request.
pub fn cmd_analyze(
    config: &AppConfig,
    bridge_script: Option<&str>,
    url: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = build_harness_settings(config, &[]);
    let harness = SignupHarness::new(Box::new(launcher(config, bridge_script)), settings);

    let request = AnalyzeRequest {
        url: Some(url.to_string()),
    };
    match harness.analyze(&request) {
        Ok(response) => {
            print_json(&response)?;
            Ok(true)
        }
        Err(e) => {
            print_error(&e)?;
            Ok(false)
        }
    }
}

// ============================================================================
// create subcommand
// ============================================================================

/// Run a batch and print the payload. Returns false when the request was rejected
/// or the batch could not start.
pub fn cmd_create(
    config: &AppConfig,
    bridge_script: Option<&str>,
    url: &str,
    count: i64,
    allow_hosts: &[String],
    seed: Option<u64>,
    trace_file: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = build_harness_settings(config, allow_hosts);
    let mut harness = SignupHarness::new(Box::new(launcher(config, bridge_script)), settings)
        .with_pacing(build_pacing(config, seed));

    if let Some(seed) = seed {
        harness = harness.with_identities(Box::new(FakeIdentitySource::seeded(
            seed,
            config.identity.clone(),
        )));
    } else {
        harness = harness.with_identities(Box::new(FakeIdentitySource::new(
            config.identity.clone(),
        )));
    }

    if let Some(path) = trace_file.or(config.trace.path.as_deref()) {
        harness = harness.with_tracer(TraceLogger::new(path));
    }

    let request = CreateRequest {
        url: Some(url.to_string()),
        count: Some(count),
    };
    match harness.create(&request) {
        Ok(response) => {
            print_json(&response)?;
            Ok(true)
        }
        Err(e) => {
            print_error(&e)?;
            Ok(false)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_error(error: &HarnessError) -> Result<(), serde_json::Error> {
    print_json(&ErrorResponse {
        error: error.to_string(),
    })
}
