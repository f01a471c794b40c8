//! newsclass Server
//!
//! Single-model text-classification service. `serve` loads the artifact and
//! answers HTTP predictions; `classify` runs one prediction from the command
//! line and can be used as an end-to-end health probe.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use newsclass_classifiers::ModelHolder;
use newsclass_server::cli::{ClassifyArgs, Cli, Commands, ServeArgs};
use newsclass_server::{run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Classify(args) => classify(args),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_tracing(args.verbose);

    info!("Starting newsclass server");

    let config = ServerConfig::load(&args.config)?.with_overrides(&args);
    info!("Configuration loaded successfully");
    info!("Artifact: {}", config.resolved_artifact_path().display());
    info!("Require model: {}", config.require_model);

    let metrics_handle = init_metrics()?;

    run_server(config, Some(metrics_handle)).await
}

fn classify(args: ClassifyArgs) -> Result<()> {
    init_tracing(args.verbose);

    let config =
        ServerConfig::load(&args.config)?.with_artifact_override(args.artifact.as_deref());
    let holder = ModelHolder::new(config.resolved_artifact_path());
    holder.load()?;

    let category = holder.predict(&args.text)?;
    println!("{}", category);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("newsclass_server=debug,newsclass_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("newsclass_server=info,newsclass_classifiers=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "newsclass_load_attempts_total",
        "Model load attempts by outcome"
    );
    metrics::describe_counter!(
        "newsclass_requests_total",
        "Total number of prediction requests received"
    );
    metrics::describe_counter!(
        "newsclass_predictions_total",
        "Prediction attempts by outcome"
    );
    metrics::describe_histogram!(
        "newsclass_prediction_latency_us",
        metrics::Unit::Microseconds,
        "Prediction latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
