use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::types::{Reachability, Target};

/// Explicit connect bound. OS default connect timeouts can run to minutes
/// on some platforms; a probe must return well before the next tick.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe trait so the monitor can substitute a scripted prober in tests
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Perform one reachability check against the target
    async fn probe(&self, target: &Target) -> Reachability;
}

/// Production prober: one TCP connect per call, TLS handshake on port 443.
///
/// No retries here; retrying is the scheduler's job via repeated ticks.
pub struct TcpProber {
    timeout: Duration,
    tls: TlsConnector,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self { timeout, tls: TlsConnector::from(Arc::new(config)) }
    }

    /// Probe with the TLS decision supplied by the caller rather than
    /// derived from the port
    pub async fn probe_with(&self, target: &Target, use_tls: bool) -> Reachability {
        match timeout(self.timeout, self.connect(target, use_tls)).await {
            Ok(Ok(())) => Reachability::Reachable,
            Ok(Err(error)) => {
                tracing::debug!(server = %target, %error, "probe failed");
                Reachability::Unreachable
            }
            Err(_) => {
                tracing::debug!(
                    server = %target,
                    timeout_secs = self.timeout.as_secs(),
                    "probe timed out"
                );
                Reachability::Unreachable
            }
        }
    }

    async fn connect(&self, target: &Target, use_tls: bool) -> Result<()> {
        let stream = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .context("TCP connect failed")?;

        if use_tls {
            let name = ServerName::try_from(target.host.clone())
                .context("invalid TLS server name")?;
            self.tls
                .connect(name, stream)
                .await
                .context("TLS handshake failed")?;
        }

        Ok(())
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait::async_trait]
impl Probe for TcpProber {
    async fn probe(&self, target: &Target) -> Reachability {
        self.probe_with(target, target.port == 443).await
    }
}

/// One-shot convenience check used by the `serverstatus` binary
pub async fn is_running(host: &str, port: u16) -> bool {
    let target = Target::new(host, port);
    TcpProber::default().probe(&target).await.is_reachable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    fn prober() -> TcpProber {
        TcpProber::new(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn listening_endpoint_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let _ = listener.accept().await;
            }
        });

        let target = Target::new("127.0.0.1", addr.port());
        assert_eq!(prober().probe(&target).await, Reachability::Reachable);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = Target::new("127.0.0.1", port);
        assert_eq!(prober().probe(&target).await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn unresolvable_host_is_unreachable() {
        let target = Target::new("does-not-exist.invalid", 80);
        assert_eq!(prober().probe(&target).await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn probe_respects_timeout_bound() {
        // TEST-NET-3 address; nothing should answer, so this exercises the
        // timeout path rather than a fast refusal.
        let target = Target::new("203.0.113.1", 80);
        let prober = TcpProber::new(Duration::from_millis(500));

        let start = Instant::now();
        let result = prober.probe(&target).await;

        assert_eq!(result, Reachability::Unreachable);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn tls_handshake_failure_is_unreachable() {
        // Accepts TCP but closes without ever speaking TLS, so a connect-only
        // probe would wrongly report the endpoint as up.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        let target = Target::new("127.0.0.1", addr.port());
        assert_eq!(
            prober().probe_with(&target, true).await,
            Reachability::Unreachable
        );
    }
}
