use std::time::Duration;

use clap::Parser;
use signup_harness::cli::config::{
    AppConfig, Cli, Commands, build_pacing, build_harness_settings, load_config, parse_config,
};
use signup_harness::detect::signup_detector::LinkTieBreak;
use signup_harness::orchestrator::batch::SubmitPolicy;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_analyze() {
    let cli = Cli::parse_from(["signup-harness", "analyze", "--url", "https://app.test"]);
    match cli.command {
        Commands::Analyze { url } => assert_eq!(url, "https://app.test"),
        _ => panic!("Expected Analyze command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_create_minimal() {
    let cli = Cli::parse_from([
        "signup-harness",
        "create",
        "--url",
        "https://staging.app.test/signup",
        "--count",
        "3",
    ]);
    match cli.command {
        Commands::Create {
            url,
            count,
            allow_hosts,
            seed,
            trace_file,
        } => {
            assert_eq!(url, "https://staging.app.test/signup");
            assert_eq!(count, 3);
            assert!(allow_hosts.is_empty());
            assert!(seed.is_none());
            assert!(trace_file.is_none());
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn cli_parse_create_all_args() {
    let cli = Cli::parse_from([
        "signup-harness",
        "-vv",
        "--config",
        "qa.yaml",
        "--bridge-script",
        "bridge.js",
        "create",
        "--url",
        "https://app.test",
        "--count",
        "9",
        "--allow-host",
        "app.test",
        "--allow-host",
        "qa.app.test",
        "--seed",
        "42",
        "--trace-file",
        "runs.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("qa.yaml"));
    assert_eq!(cli.bridge_script.as_deref(), Some("bridge.js"));
    match cli.command {
        Commands::Create {
            count,
            allow_hosts,
            seed,
            trace_file,
            ..
        } => {
            // range is enforced by the Create operation, not by clap
            assert_eq!(count, 9);
            assert_eq!(allow_hosts, vec!["app.test", "qa.app.test"]);
            assert_eq!(seed, Some(42));
            assert_eq!(trace_file.as_deref(), Some("runs.jsonl"));
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn cli_create_requires_count() {
    let result = Cli::try_parse_from(["signup-harness", "create", "--url", "https://app.test"]);
    assert!(result.is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn missing_config_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/signup-harness.yaml"));
    assert!(config.targets.allowed_hosts.is_empty());
    assert_eq!(config.browser.script, "node/browser_bridge.js");
    assert_eq!(config.timing.navigation_timeout_secs, 30);
    assert_eq!(config.timing.settle_ms, 1000);
    assert_eq!(config.timing.submit_wait_ms, 3000);
    assert_eq!(config.policy.on_missing_submit, SubmitPolicy::RecordSuccess);
    assert_eq!(config.policy.link_tie_break, LinkTieBreak::LastMatch);
    assert_eq!(config.identity.country, "Nigeria");
}

#[test]
fn malformed_config_gives_defaults() {
    let config = parse_config("targets: [this is: not valid");
    assert!(config.targets.allowed_hosts.is_empty());
    assert_eq!(config.timing.pacing_max_ms, 3000);
}

#[test]
fn partial_config_fills_in_defaults() {
    let yaml = r#"
targets:
  allowed_hosts:
    - staging.app.test
timing:
  settle_ms: 250
policy:
  on_missing_submit: record_failure
  link_tie_break: first_match
identity:
  country: Ghana
"#;
    let config = parse_config(yaml);

    assert_eq!(config.targets.allowed_hosts, vec!["staging.app.test"]);
    assert_eq!(config.timing.settle_ms, 250);
    assert_eq!(config.timing.navigation_timeout_secs, 30);
    assert_eq!(config.policy.on_missing_submit, SubmitPolicy::RecordFailure);
    assert_eq!(config.policy.link_tie_break, LinkTieBreak::FirstMatch);
    assert_eq!(config.identity.country, "Ghana");
    assert_eq!(config.identity.phone_prefix, "+234");
}

#[test]
fn config_file_is_read_from_disk() {
    let path = std::env::temp_dir().join(format!("signup_harness_cfg_{}.yaml", std::process::id()));
    std::fs::write(&path, "browser:\n  script: /opt/bridge.js\n  user_agent: QA-Bot/2\n").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.browser.script, "/opt/bridge.js");
    assert_eq!(config.browser.user_agent.as_deref(), Some("QA-Bot/2"));

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Settings Builders
// ============================================================================

#[test]
fn harness_settings_merge_file_and_cli_hosts() {
    let mut config = AppConfig::default();
    config.targets.allowed_hosts = vec!["app.test".into()];
    config.timing.navigation_timeout_secs = 10;
    config.timing.submit_wait_ms = 500;
    config.policy.on_missing_submit = SubmitPolicy::RecordFailure;

    let settings = build_harness_settings(&config, &["qa.example.com".to_string()]);

    assert_eq!(settings.targets.allowed_hosts, vec!["app.test", "qa.example.com"]);
    assert_eq!(settings.orchestrator.navigation_timeout, Duration::from_secs(10));
    assert_eq!(settings.orchestrator.settle, Duration::from_millis(1000));
    assert_eq!(settings.orchestrator.submit_wait, Duration::from_millis(500));
    assert_eq!(settings.orchestrator.submit_policy, SubmitPolicy::RecordFailure);
    assert!(settings.targets.check("https://qa.example.com/join").is_ok());
}

#[test]
fn pacing_built_from_timing() {
    let mut config = AppConfig::default();
    config.timing.pacing_min_ms = 200;
    config.timing.pacing_max_ms = 400;

    let mut pacing = build_pacing(&config, Some(5));
    assert_eq!(
        pacing.bounds(),
        (Duration::from_millis(200), Duration::from_millis(400))
    );
    for _ in 0..10 {
        let d = pacing.next_delay();
        assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(400));
    }
}
