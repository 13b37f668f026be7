use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serverstatus::Target;

use super::{Notifier, NotifyError};
use crate::config::SmtpSettings;

const ALERT_SUBJECT: &str = "Monitoring Alert";

/// SMTP notifier: authenticated STARTTLS submission with the monitor log
/// attached as evidence. The sender address is the SMTP username.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Recipient and sender addresses are parsed here, so a bad address is
    /// a startup failure rather than a silent alert drop later.
    pub fn new(smtp: &SmtpSettings, receivers: &[String]) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            .port(smtp.port)
            .credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()))
            .build();

        let from: Mailbox = smtp.username.parse()?;
        let to = receivers
            .iter()
            .map(|receiver| receiver.parse())
            .collect::<Result<Vec<Mailbox>, _>>()?;

        Ok(Self { transport, from, to })
    }

    async fn attachment_part(path: &Path) -> Option<SinglePart> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) => {
                // The alert still goes out without its evidence.
                tracing::warn!(path = %path.display(), %error, "skipping unreadable attachment");
                return None;
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Some(Attachment::new(filename).body(bytes, ContentType::TEXT_PLAIN))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(
        &self,
        target: &Target,
        message: &str,
        attachments: &[PathBuf],
    ) -> Result<(), NotifyError> {
        tracing::info!(server = %target, "sending alert email");

        let mut builder = Message::builder().from(self.from.clone()).subject(ALERT_SUBJECT);
        for to in &self.to {
            builder = builder.to(to.clone());
        }

        let mut body = MultiPart::mixed().singlepart(SinglePart::plain(message.to_string()));
        for path in attachments {
            if let Some(part) = Self::attachment_part(path).await {
                body = body.singlepart(part);
            }
        }

        let email = builder.multipart(body)?;
        self.transport.send(email).await?;

        Ok(())
    }
}
