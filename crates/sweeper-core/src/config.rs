//! Configuration loaded from the environment.
//!
//! 起動時に 1 回だけ読み込み、所有権ごと builder に渡します。
//! 以後どこからも環境変数を読みません。
//!
//! | variable | default |
//! |---|---|
//! | `MINIO_HOST` | `minio` |
//! | `MINIO_PORT` | `9000` |
//! | `MINIO_SECURE` | `false` |
//! | `MINIO_REGION` | `us-east-1` |
//! | `MINIO_USER` | required |
//! | `MINIO_PASSWORD` | required |
//! | `MINIO_BUCKET` | `videos` |
//! | `RETENTION_PERIOD` | `2m` |
//! | `SWEEP_INTERVAL` | `2m` |
//! | `SWEEP_DRY_RUN` | `false` |
//! | `LOG_FORMAT` | `pretty` |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::observability::LogFormat;

pub const MINIO_HOST: &str = "MINIO_HOST";
pub const MINIO_PORT: &str = "MINIO_PORT";
pub const MINIO_SECURE: &str = "MINIO_SECURE";
pub const MINIO_REGION: &str = "MINIO_REGION";
pub const MINIO_USER: &str = "MINIO_USER";
pub const MINIO_PASSWORD: &str = "MINIO_PASSWORD";
pub const MINIO_BUCKET: &str = "MINIO_BUCKET";
pub const RETENTION_PERIOD: &str = "RETENTION_PERIOD";
pub const SWEEP_INTERVAL: &str = "SWEEP_INTERVAL";
pub const SWEEP_DRY_RUN: &str = "SWEEP_DRY_RUN";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "minio";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_BUCKET: &str = "videos";
const DEFAULT_RETENTION: Duration = Duration::from_secs(2 * 60);
const DEFAULT_INTERVAL: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Object store connection settings.
#[derive(Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

impl StoreConfig {
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Process-wide sweeper settings, immutable after startup.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub store: StoreConfig,
    pub retention_period: Duration,
    pub sweep_interval: Duration,
    pub dry_run: bool,
    pub log_format: LogFormat,
}

impl SweeperConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = StoreConfig {
            host: get(MINIO_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match get(MINIO_PORT) {
                Some(raw) => parse_port(&raw)?,
                None => DEFAULT_PORT,
            },
            secure: parse_bool_or(MINIO_SECURE, get(MINIO_SECURE), false)?,
            region: get(MINIO_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key: get(MINIO_USER).ok_or(ConfigError::Missing(MINIO_USER))?,
            secret_key: get(MINIO_PASSWORD).ok_or(ConfigError::Missing(MINIO_PASSWORD))?,
            bucket: get(MINIO_BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        };

        let retention_period =
            parse_duration_or(RETENTION_PERIOD, get(RETENTION_PERIOD), DEFAULT_RETENTION)?;
        let sweep_interval =
            parse_duration_or(SWEEP_INTERVAL, get(SWEEP_INTERVAL), DEFAULT_INTERVAL)?;

        let log_format = match get(LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|reason| ConfigError::Invalid {
                var: LOG_FORMAT,
                value: raw.clone(),
                reason,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            store,
            retention_period,
            sweep_interval,
            dry_run: parse_bool_or(SWEEP_DRY_RUN, get(SWEEP_DRY_RUN), false)?,
            log_format,
        })
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::Invalid {
            var: MINIO_PORT,
            value: raw.to_string(),
            reason: "expected a port number between 1 and 65535".to_string(),
        }),
        Ok(port) => Ok(port),
    }
}

fn parse_bool_or(
    var: &'static str,
    raw: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Parses a humantime duration such as `90s`, `2m` or `1h 30m`.
fn parse_duration_or(
    var: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let parsed = humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::Invalid {
        var,
        value: raw.clone(),
        reason: e.to_string(),
    })?;
    if parsed.is_zero() {
        return Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "duration must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}
