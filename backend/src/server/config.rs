//! Application configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Configuration errors surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// SMTP settings for the best-effort signup notification.
///
/// All four variables must be present for the notifier to be enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub relay: String,
    pub username: String,
    pub password: String,
    pub notify_to: String,
}

/// Everything the server needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub admin_token: String,
    pub artifact_dir: PathBuf,
    pub artifact_retention: Duration,
    pub usage_gate_capacity: usize,
    pub email_mirror_path: Option<PathBuf>,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Required: `DATABASE_URL`, `ADMIN_TOKEN`. Optional with defaults:
    /// `BIND_ADDR` (0.0.0.0:8080), `ARTIFACT_DIR` (uploads),
    /// `ARTIFACT_RETENTION_SECS` (3600), `USAGE_GATE_CAPACITY` (10000).
    /// Optional features: `EMAIL_MIRROR_PATH` enables the flat mirror;
    /// `SMTP_RELAY` + `SMTP_USERNAME` + `SMTP_PASSWORD` +
    /// `SIGNUP_NOTIFY_TO` together enable the notifier, a partial set logs
    /// a warning and disables it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing required variables or values
    /// that fail to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing { name })
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|err| ConfigError::Invalid {
                name: "BIND_ADDR",
                message: format!("{err}"),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let artifact_retention = match lookup("ARTIFACT_RETENTION_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|err| ConfigError::Invalid {
                    name: "ARTIFACT_RETENTION_SECS",
                    message: format!("{err}"),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(3600),
        };

        let usage_gate_capacity = match lookup("USAGE_GATE_CAPACITY") {
            Some(raw) => raw.parse().map_err(|err| ConfigError::Invalid {
                name: "USAGE_GATE_CAPACITY",
                message: format!("{err}"),
            })?,
            None => 10_000,
        };

        let smtp_vars = [
            lookup("SMTP_RELAY"),
            lookup("SMTP_USERNAME"),
            lookup("SMTP_PASSWORD"),
            lookup("SIGNUP_NOTIFY_TO"),
        ];
        let smtp = match smtp_vars {
            [Some(relay), Some(username), Some(password), Some(notify_to)] => Some(SmtpConfig {
                relay,
                username,
                password,
                notify_to,
            }),
            [None, None, None, None] => None,
            _ => {
                warn!("partial SMTP configuration; signup notification disabled");
                None
            }
        };

        Ok(Self {
            bind_addr,
            database_url: required("DATABASE_URL")?,
            admin_token: required("ADMIN_TOKEN")?,
            artifact_dir: lookup("ARTIFACT_DIR")
                .map_or_else(|| PathBuf::from("uploads"), PathBuf::from),
            artifact_retention,
            usage_gate_capacity,
            email_mirror_path: lookup("EMAIL_MIRROR_PATH").map(PathBuf::from),
            smtp,
        })
    }
}
