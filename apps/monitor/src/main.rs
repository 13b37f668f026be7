mod cli;
mod config;
mod logging;
mod monitoring;
mod notify;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serverstatus::{TcpProber, DEFAULT_PROBE_TIMEOUT};
use tokio::sync::Mutex;

use crate::cli::Cli;
use crate::config::Settings;
use crate::monitoring::{Scheduler, StatusMonitor};
use crate::notify::EmailNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; deployments may set the variables directly.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli).context("invalid configuration")?;

    logging::init(&settings.log_file)?;

    if settings.interval.is_zero() {
        tracing::warn!("check interval is zero; checks will run back to back");
    }

    tracing::info!(
        server = %settings.target,
        interval_secs = settings.interval.as_secs(),
        limit = settings.threshold,
        receivers = settings.receivers.len(),
        "monitor configured"
    );

    let prober = Arc::new(TcpProber::new(DEFAULT_PROBE_TIMEOUT));
    let notifier = Arc::new(
        EmailNotifier::new(&settings.smtp, &settings.receivers)
            .context("invalid alert configuration")?,
    );

    let monitor = Arc::new(Mutex::new(StatusMonitor::new(
        settings.target.clone(),
        settings.threshold,
        prober,
        notifier,
        settings.log_file.clone(),
    )));

    let scheduler = Scheduler::new(settings.interval, move || {
        let monitor = Arc::clone(&monitor);
        async move {
            monitor.lock().await.check().await;
        }
    });

    println!("Starting monitor, press CTRL+C to stop.");
    scheduler.start();

    tokio::signal::ctrl_c().await.context("failed to listen for interrupt")?;

    println!("Monitor is shutting down...");
    scheduler.stop();

    Ok(())
}
