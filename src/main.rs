use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mirage::EndpointKind;
use mirage::api::{ApiClient, HttpTransport};
use mirage::core::checks::{CheckSettings, run_checks};
use mirage::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "mirage", about = "Smoke checks for AI inference APIs")]
struct Args {
    /// Base URL of the API under check (overrides config and env)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Run only the checks for a single endpoint
    #[arg(short, long, value_enum)]
    only: Option<EndpointKind>,

    /// Path to an alternate config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to mirage.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("mirage.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let loaded = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mirage: {e}");
            return ExitCode::from(2);
        }
    };
    let resolved = config::resolve(&loaded, args.base_url.as_deref());

    log::info!("mirage starting up against {}", resolved.base_url);

    let transport = HttpTransport::new(resolved.base_url.clone(), resolved.api_key.clone());
    let client = ApiClient::new(Arc::new(transport));
    let settings = CheckSettings::from_config(&resolved);

    let report = run_checks(&client, &settings, args.only).await;
    print!("{}", report.render());

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
