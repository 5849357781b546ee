use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::harness::{HarnessSettings, TargetPolicy};
use crate::detect::signup_detector::LinkTieBreak;
use crate::identity::generator::IdentityProfile;
use crate::orchestrator::batch::{OrchestratorConfig, SubmitPolicy};
use crate::orchestrator::pacing::PacingPolicy;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "signup-harness",
    version,
    about = "Registration-flow QA harness: detect and exercise signup forms on sites you are authorized to test"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: signup-harness.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to the browser bridge script
    #[arg(long, global = true)]
    pub bridge_script: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a page and report whether it exposes a signup path
    Analyze {
        #[arg(long)]
        url: String,
    },

    /// Fill and submit the signup form of an allowed target several times
    Create {
        #[arg(long)]
        url: String,

        /// Number of attempts (2-7)
        #[arg(long)]
        count: i64,

        /// Extra allowed host, in addition to targets.allowed_hosts
        #[arg(long = "allow-host")]
        allow_hosts: Vec<String>,

        /// Seed for identity generation and pacing
        #[arg(long)]
        seed: Option<u64>,

        /// Append one JSON line per attempt to this file
        #[arg(long)]
        trace_file: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `signup-harness.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub identity: IdentityProfile,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_script")]
    pub script: String,

    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    #[serde(default = "default_submit_wait")]
    pub submit_wait_ms: u64,

    #[serde(default = "default_pacing_min")]
    pub pacing_min_ms: u64,

    #[serde(default = "default_pacing_max")]
    pub pacing_max_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: 30,
            settle_ms: 1000,
            submit_wait_ms: 3000,
            pacing_min_ms: 1000,
            pacing_max_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub on_missing_submit: SubmitPolicy,

    #[serde(default)]
    pub link_tie_break: LinkTieBreak,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_script() -> String { "node/browser_bridge.js".to_string() }
fn default_navigation_timeout() -> u64 { 30 }
fn default_settle() -> u64 { 1000 }
fn default_submit_wait() -> u64 { 3000 }
fn default_pacing_min() -> u64 { 1000 }
fn default_pacing_max() -> u64 { 3000 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("signup-harness.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> AppConfig {
    match serde_yaml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build runtime settings, adding CLI `--allow-host` values to the file's list.
pub fn build_harness_settings(config: &AppConfig, extra_hosts: &[String]) -> HarnessSettings {
    let timing = &config.timing;
    HarnessSettings {
        orchestrator: OrchestratorConfig {
            navigation_timeout: Duration::from_secs(timing.navigation_timeout_secs),
            settle: Duration::from_millis(timing.settle_ms),
            submit_wait: Duration::from_millis(timing.submit_wait_ms),
            submit_policy: config.policy.on_missing_submit,
        },
        tie_break: config.policy.link_tie_break,
        targets: TargetPolicy::new(
            config
                .targets
                .allowed_hosts
                .iter()
                .chain(extra_hosts.iter())
                .cloned(),
        ),
    }
}

pub fn build_pacing(config: &AppConfig, seed: Option<u64>) -> PacingPolicy {
    let pacing = PacingPolicy::new(
        Duration::from_millis(config.timing.pacing_min_ms),
        Duration::from_millis(config.timing.pacing_max_ms),
    );
    match seed {
        Some(seed) => pacing.with_seed(seed),
        None => pacing,
    }
}
