use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Initialize tracing with a compact console layer plus a plain-text file
/// layer. The file doubles as alert evidence: the notifier attaches it to
/// outgoing emails.
///
/// The log file is truncated on every start; check history does not persist
/// across restarts.
pub fn init(log_path: &Path) -> Result<()> {
    let log_file = File::create(log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    let console_layer = tracing_subscriber::fmt::layer().compact().with_filter(env_filter);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(log_file))
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry().with(console_layer).with(file_layer).init();

    Ok(())
}
