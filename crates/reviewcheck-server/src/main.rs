use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use reviewcheck_classifiers::init_registry_from_config;
use reviewcheck_core::PredictionRequest;
use reviewcheck_server::cli::{Cli, Commands, PredictArgs};
use reviewcheck_server::config::ServerConfig;
use reviewcheck_server::predict::run_prediction;
use reviewcheck_server::server::run_server;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging(args.models.verbose);

            let config = ServerConfig::load(&args)?;
            info!("Starting reviewcheck v{}", env!("CARGO_PKG_VERSION"));

            let metrics_handle = init_metrics()?;
            run_server(config, Some(metrics_handle)).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Predict(args) => {
            init_logging(args.models.verbose);
            predict_once(args).await
        }
    }
}

/// Load the registry, classify one review and print the outcome
async fn predict_once(args: PredictArgs) -> anyhow::Result<ExitCode> {
    let mut config = ServerConfig::from_file_or_default(&args.models.config)?;
    config.apply_model_args(&args.models);

    let registry = Arc::new(init_registry_from_config(&config.classifiers));
    let request = PredictionRequest::new(args.text, args.model);

    match run_prediction(registry, request).await {
        Ok(result) => {
            println!("{}", result.prediction_text);
            println!("{}", result.fake_prob);
            println!("{}", result.real_prob);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Initialize tracing/logging. Logs go to stderr so `predict` output stays clean.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("reviewcheck=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("reviewcheck=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "reviewcheck_requests_total",
        "Total number of page requests by route"
    );
    metrics::describe_counter!(
        "reviewcheck_predictions_total",
        "Total number of successful predictions by model and verdict"
    );
    metrics::describe_counter!(
        "reviewcheck_prediction_errors_total",
        "Total number of failed predictions by kind"
    );
    metrics::describe_histogram!(
        "reviewcheck_prediction_latency_us",
        metrics::Unit::Microseconds,
        "Model inference latency in microseconds by model"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
