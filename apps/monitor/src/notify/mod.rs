pub mod email;

pub use email::EmailNotifier;

use std::path::PathBuf;

use async_trait::async_trait;
use serverstatus::Target;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build alert email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Alerting side channel triggered on threshold crossing
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a free-text alert about the target, attaching any readable
    /// evidence files
    async fn notify(
        &self,
        target: &Target,
        message: &str,
        attachments: &[PathBuf],
    ) -> Result<(), NotifyError>;
}
