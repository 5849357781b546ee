use clap::Parser;
use signup_harness::cli::commands::{cmd_analyze, cmd_create};
use signup_harness::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());
    let bridge_script = cli.bridge_script.as_deref();

    let ok = match cli.command {
        Commands::Analyze { url } => cmd_analyze(&config, bridge_script, &url)?,
        Commands::Create {
            url,
            count,
            allow_hosts,
            seed,
            trace_file,
        } => cmd_create(
            &config,
            bridge_script,
            &url,
            count,
            &allow_hosts,
            seed,
            trace_file.as_deref(),
        )?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
