use std::process::exit;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use txquery::dataset::DatasetLoader;
use txquery::server::router;

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: If I was making a much more sophisticated CLI application, I would have used the clap crate
    //      to handle the CLI parsing and execution.
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 4 {
        eprintln!("Usage: txquery [data_dir] [bind_addr] [log_level]");
        eprintln!("Defaults: data 127.0.0.1:8000 info");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: info)");
        exit(1);
    }

    let data_dir = args.get(1).map(String::as_str).unwrap_or("data");
    let bind_addr = args.get(2).map(String::as_str).unwrap_or("127.0.0.1:8000");
    let log_level = args.get(3)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::INFO);

    setup_logging(log_level);

    let loader = DatasetLoader::new(data_dir);
    info!("Serving datasets from [{}]", loader.data_dir().display());

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(loader))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(cause) = tokio::signal::ctrl_c().await {
        error!("Failed to install the Ctrl-C handler: {cause}");
        return std::future::pending().await;
    }

    info!("Shutdown signal received");
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
