use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use serverstatus::Target;
use thiserror::Error;

use crate::cli::Cli;

// time constants
const DAY: u64 = 86_400;
const HOUR: u64 = 3_600;
const MINUTE: u64 = 60;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_RECEIVERS_FILE: &str = "receivers.json";
const DEFAULT_LOG_FILE: &str = "monitor.log";

/// Startup-time configuration failure. Always fatal; nothing has been
/// scheduled when one of these surfaces.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("port 0 is not a valid target port")]
    InvalidPort,
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("failed to read receivers file {path}: {source}")]
    ReceiversRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse receivers file {path}: {source}")]
    ReceiversParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("receivers file {path} lists no receivers")]
    NoReceivers { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct Settings {
    pub target: Target,
    pub interval: Duration,
    pub threshold: u32,
    pub receivers: Vec<String>,
    pub log_file: PathBuf,
    pub smtp: SmtpSettings,
}

#[derive(Debug, Deserialize)]
struct ReceiversFile {
    receivers: Vec<String>,
}

impl Settings {
    /// Assemble runtime settings from the CLI surface plus the process
    /// environment (SMTP_USER, SMTP_PASSWORD, and the optional SMTP_HOST,
    /// SMTP_PORT, RECEIVERS_FILE and MONITOR_LOG overrides).
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let smtp = SmtpSettings {
            host: env_or("SMTP_HOST", DEFAULT_SMTP_HOST),
            port: env_parsed("SMTP_PORT", DEFAULT_SMTP_PORT)?,
            username: require_env("SMTP_USER")?,
            password: require_env("SMTP_PASSWORD")?,
        };

        let receivers_path = PathBuf::from(env_or("RECEIVERS_FILE", DEFAULT_RECEIVERS_FILE));
        let receivers = collect_receivers(&receivers_path)?;

        Ok(Self {
            target: Target::new(cli.server_address.clone(), cli.port),
            interval: check_interval(cli.days, cli.hours, cli.minutes, cli.seconds),
            threshold: cli.limit,
            receivers,
            log_file: PathBuf::from(env_or("MONITOR_LOG", DEFAULT_LOG_FILE)),
            smtp,
        })
    }
}

/// Compose the check interval from its day/hour/minute/second parts.
/// Zero is accepted; the caller warns about the busy-loop it implies.
fn check_interval(days: u64, hours: u64, minutes: u64, seconds: u64) -> Duration {
    Duration::from_secs(days * DAY + hours * HOUR + minutes * MINUTE + seconds)
}

/// Read the alert recipient list from a JSON file with a `receivers` array
fn collect_receivers(path: &Path) -> Result<Vec<String>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReceiversRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: ReceiversFile =
        serde_json::from_str(&raw).map_err(|source| ConfigError::ReceiversParse {
            path: path.to_path_buf(),
            source,
        })?;

    if parsed.receivers.is_empty() {
        return Err(ConfigError::NoReceivers { path: path.to_path_buf() });
    }

    Ok(parsed.receivers)
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// An unset variable falls back to the default; a set-but-unparsable one is
/// a fatal configuration error, not a silent fallback.
fn env_parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        Err(_) => Ok(default),
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn interval_composes_all_parts() {
        assert_eq!(check_interval(0, 0, 0, 1), Duration::from_secs(1));
        assert_eq!(check_interval(0, 0, 2, 30), Duration::from_secs(150));
        assert_eq!(
            check_interval(1, 2, 3, 4),
            Duration::from_secs(86_400 + 7_200 + 180 + 4)
        );
        assert_eq!(check_interval(0, 0, 0, 0), Duration::ZERO);
    }

    #[test]
    fn receivers_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"receivers": ["one@example.com", "two@example.com"]}}"#).unwrap();

        let receivers = collect_receivers(file.path()).unwrap();
        assert_eq!(receivers, vec!["one@example.com", "two@example.com"]);
    }

    #[test]
    fn empty_receivers_list_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"receivers": []}}"#).unwrap();

        assert!(matches!(
            collect_receivers(file.path()),
            Err(ConfigError::NoReceivers { .. })
        ));
    }

    #[test]
    fn malformed_receivers_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            collect_receivers(file.path()),
            Err(ConfigError::ReceiversParse { .. })
        ));
    }

    #[test]
    fn missing_receivers_file_is_rejected() {
        let path = Path::new("/nonexistent/receivers.json");

        assert!(matches!(
            collect_receivers(path),
            Err(ConfigError::ReceiversRead { .. })
        ));
    }

    fn cli_with_port(port: u16) -> Cli {
        Cli {
            server_address: "example.com".to_string(),
            port,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 1,
            limit: 5,
        }
    }

    #[test]
    fn port_zero_is_rejected_before_anything_else() {
        assert!(matches!(
            Settings::from_cli(&cli_with_port(0)),
            Err(ConfigError::InvalidPort)
        ));
    }

    #[test]
    fn missing_required_env_is_rejected() {
        assert!(matches!(
            require_env("MONITOR_TEST_UNSET_VAR"),
            Err(ConfigError::MissingEnv("MONITOR_TEST_UNSET_VAR"))
        ));
    }

    #[test]
    fn unparsable_env_value_is_rejected() {
        env::set_var("MONITOR_TEST_BAD_PORT", "not-a-port");

        assert!(matches!(
            env_parsed::<u16>("MONITOR_TEST_BAD_PORT", 587),
            Err(ConfigError::InvalidEnv { name: "MONITOR_TEST_BAD_PORT", .. })
        ));

        env::remove_var("MONITOR_TEST_BAD_PORT");
    }

    #[test]
    fn unset_env_value_falls_back_to_default() {
        assert_eq!(env_parsed("MONITOR_TEST_UNSET_PORT", 587u16).unwrap(), 587);
    }
}
