//! tfreport CLI entry point.
//!
//! This binary provides the command-line interface for tfreport.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tfreport::cli::{Cli, Commands};
use tfreport::{Config, GitHubClient, Pipeline, Reporter, RunContext, TfReportError, TriggerEvent};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    // Run the appropriate command
    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            // Print error with full chain
            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            // Print backtrace if RUST_BACKTRACE is set
            let backtrace = e.backtrace();
            if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
                eprintln!("\nStack backtrace:");
                let backtrace_str = format!("{backtrace}");
                for line in backtrace_str.lines() {
                    let trimmed = line.trim();
                    if trimmed.contains("tfreport::")
                        || (trimmed.starts_with("at ") && trimmed.contains("./src/"))
                    {
                        eprintln!("{line}");
                    }
                }
            }

            let code = e
                .downcast_ref::<TfReportError>()
                .map_or(1, TfReportError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // First try to use RUST_LOG from environment, otherwise use verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // Filter string: tfreport at the chosen level, everything else at warn
            EnvFilter::new(format!("warn,tfreport={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Load configuration
    tracing::debug!("Loading configuration");
    let config = load_config(&cli)?;
    tracing::debug!("Configuration loaded successfully");

    match cli.command {
        Commands::Run(args) => {
            let mut config = config;
            if let Some(included) = args.included_file_types {
                config.scan.included_file_types = included;
            }
            if let Some(excluded) = args.excluded_file_types {
                config.scan.excluded_file_types = excluded;
            }
            if let Some(report_dir) = args.report_dir {
                config.output.report_dir = report_dir;
            }
            if args.github_token.is_some() {
                config.github.token = args.github_token;
            }
            config.load_token_from_env();

            // Inline event payload wins over the event file.
            let event = if let Some(json) = &args.event {
                TriggerEvent::from_json(json)?
            } else if let Some(path) = &args.event_file {
                TriggerEvent::from_file(path)?
            } else {
                tracing::debug!("No trigger event provided, using empty event");
                TriggerEvent::default()
            };

            let context = RunContext::from_env();
            let github = GitHubClient::new(&config)?;
            let pipeline = Pipeline::new(config, Reporter::new(args.format));

            let artifact = pipeline
                .run(&event, &context, &github, &args.working_directory)
                .await?;

            println!("{}", artifact.display());
            Ok(ExitCode::from(0))
        }

        Commands::Init => {
            // Generate example configuration file
            let example_config = Config::example_yaml();
            let config_path = std::path::Path::new("tfreport.yaml");

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, example_config)?;
            println!("Created example configuration: tfreport.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => {
            // Validate configuration file
            let config_content = std::fs::read_to_string(&args.config)?;
            match Config::from_yaml(&config_content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::from(0))
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path)?;
        let mut config = Config::from_yaml(&content)?;
        config.load_token_from_env();
        return Ok(config);
    }

    // Look for default config files
    let default_paths = ["tfreport.yaml", "tfreport.yml", ".tfreport.yaml"];
    tracing::debug!("Searching for default configuration files");
    for path in &default_paths {
        if std::path::Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path)?;
            let mut config = Config::from_yaml(&content)?;
            config.load_token_from_env();
            return Ok(config);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    // Use default configuration
    let mut config = Config::default();
    config.load_token_from_env();
    Ok(config)
}
