use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use omnipdf_smoke::{
    backend::{self, BackendMonitor},
    config::{CliOverrides, SmokeConfig},
    report::{BackendReport, SmokeReport},
    SmokeCheck,
};

const EXIT_OK: i32 = 0;
const EXIT_CHECK_FAILED: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;

/// omnipdf-smoke - Smoke checks for the OmniPDF frontend and backends
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML config file (replaces environment-derived settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the frontend renders; skips when the app is not ready
    Check(CheckArgs),
    /// Probe the /health endpoint of every backend service
    Backends(BackendArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Frontend base URL
    #[arg(long)]
    url: Option<String>,

    /// Path requested on the frontend
    #[arg(long)]
    path: Option<String>,

    /// Text the page must contain
    #[arg(long)]
    marker: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args)]
struct BackendArgs {
    /// Per-service request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Exit non-zero when any service is unhealthy
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<&CheckArgs> for CliOverrides {
    fn from(args: &CheckArgs) -> Self {
        CliOverrides {
            base_url: args.url.clone(),
            path: args.path.clone(),
            marker: args.marker.clone(),
            timeout_secs: args.timeout_secs,
            backend_timeout_secs: None,
        }
    }
}

impl From<&BackendArgs> for CliOverrides {
    fn from(args: &BackendArgs) -> Self {
        CliOverrides {
            backend_timeout_secs: args.timeout_secs,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            EXIT_CONFIG_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let base = match &cli.config {
        Some(path) => SmokeConfig::from_yaml_file(path)?,
        None => SmokeConfig::from_env()?,
    };

    match cli.command {
        Command::Check(args) => {
            let config = base.with_overrides(CliOverrides::from(&args))?;
            log::debug!("Smoke configuration: {:?}", config);

            let result = SmokeCheck::new(&config).run().await;
            let report = SmokeReport::from_result(&result);
            emit(args.format, &report, SmokeReport::render_text)?;

            Ok(if result.is_ok() {
                EXIT_OK
            } else {
                EXIT_CHECK_FAILED
            })
        }
        Command::Backends(args) => {
            let config = base.with_overrides(CliOverrides::from(&args))?;
            log::debug!("Backend services: {:?}", config.services);

            let results = BackendMonitor::new(&config).check_all().await;
            let report = BackendReport::from_results(&results);
            emit(args.format, &report, BackendReport::render_text)?;

            Ok(if args.strict && !backend::all_healthy(&results) {
                EXIT_CHECK_FAILED
            } else {
                EXIT_OK
            })
        }
    }
}

fn emit<T: serde::Serialize>(
    format: OutputFormat,
    report: &T,
    render_text: fn(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", with_newline(render_text(report))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
