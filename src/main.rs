// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use hibiscus::{
    config::{CliArgs, Settings},
    constants::TOKIO_WORKER_THREADS,
    healthchecks::Healthchecks,
    metrics,
    providers::{LeaseProvider, OpnsenseProvider},
    refresher::Refresher,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("hibiscus")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

/// Initialize logging.
///
/// `RUST_LOG` takes precedence over `--log-level`. `RUST_LOG_FORMAT=json`
/// switches to JSON output, anything else uses the compact text format.
fn init_logging(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(args: CliArgs) -> Result<()> {
    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Hibiscus");

    let settings =
        Settings::load(args, std::env::vars()).context("Invalid Hibiscus configuration")?;
    info!(
        zones = ?settings.zones.iter().map(|z| z.key.as_str()).collect::<Vec<_>>(),
        out_dir = %settings.out_dir.display(),
        "Loaded zones"
    );
    if settings.zones.is_empty() {
        warn!("No ZONE_<ID>_* variables found, nothing will be generated");
    }

    debug!(opnsense = ?settings.opnsense, "Initializing lease provider");
    let provider = Arc::new(OpnsenseProvider::new(&settings.opnsense, &settings.zones)?);
    provider
        .init()
        .await
        .context("Failed to initialize OPNsense lease provider")?;

    if let Some(addr) = settings.metrics_addr {
        tokio::spawn(async move {
            if let Err(e) = metrics::serve_on(addr).await {
                error!(addr = %addr, error = %e, "Metrics server stopped");
            }
        });
    }

    let healthchecks = Healthchecks::new(settings.healthchecks_url.clone())?;
    let refresher = Arc::new(Refresher::new(
        provider.clone(),
        settings.zones.clone(),
        healthchecks,
    ));

    let result = match settings.refresh_interval {
        None => {
            info!("No refresh interval set, performing a one-shot run");
            refresher.run_cycle().await.map(|_| ())
        }
        Some(interval) => {
            refresher.run_daemon(interval, shutdown_signal()).await;
            Ok(())
        }
    };

    if let Err(e) = provider.release().await {
        warn!(error = %e, "Failed to release lease provider");
    }

    result.context("Refresh failed")
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
