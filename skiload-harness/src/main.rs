use clap::Parser;
use skiload_client::{Client, ClientConfig};
use skiload_harness::config::{load_parameters, ParameterOverrides};
use skiload_harness::controller::{run_load_test, RunOptions};
use skiload_harness::report::{print_summary, write_csv};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skiload", about = "Phased load-test client for the skier API")]
struct Args {
    /// JSON file with the run parameters
    #[arg(long, default_value = "client_config.json")]
    config: PathBuf,

    #[command(flatten)]
    overrides: ParameterOverrides,

    /// Where to write per-request latency samples
    #[arg(long, default_value = "load_test_results.csv")]
    csv: PathBuf,

    /// Only count successes and failures; keep no latency samples
    #[arg(long)]
    no_stats: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skiload=info,skiload_harness=info,skiload_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let params = load_parameters(&args.config, &args.overrides).unwrap_or_else(|e| {
        tracing::error!(config = %args.config.display(), error = %e, "cannot load run parameters");
        process::exit(2);
    });

    let api = Arc::new(Client::new(ClientConfig { base_url: params.server_address.clone() }));
    let options = RunOptions { track_statistics: !args.no_stats, ..RunOptions::default() };

    let report = run_load_test(&params, api, &options).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "load test could not start");
        process::exit(2);
    });

    print_summary(&report, params.max_concurrency);

    if let Some(samples) = &report.samples {
        if let Err(e) = write_csv(&args.csv, samples) {
            tracing::error!(path = %args.csv.display(), error = %e, "cannot write CSV");
            process::exit(1);
        }
        tracing::info!(path = %args.csv.display(), rows = samples.len(), "latency samples written");
    }
}
