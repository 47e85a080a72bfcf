use crate::quota::QuotaConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub quota: QuotaConfig,
    /// Optional CSV of capacity limits used to seed the capacity store.
    pub limits_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let quota = load_quota_config()?;
        let limits_csv = env::var("QUOTA_LIMITS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            quota,
            limits_csv,
        })
    }
}

fn load_quota_config() -> Result<QuotaConfig, ConfigError> {
    let defaults = QuotaConfig::default();

    let default_cycle_months = match env::var("QUOTA_DEFAULT_CYCLE_MONTHS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|months| *months > 0)
            .ok_or(ConfigError::InvalidCycleMonths)?,
        Err(_) => defaults.default_cycle_months,
    };

    let default_max_farmers = match env::var("QUOTA_DEFAULT_MAX_FARMERS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidMaxFarmers)?,
        Err(_) => defaults.default_max_farmers,
    };

    let warning_threshold = match env::var("QUOTA_WARNING_THRESHOLD") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|threshold| *threshold > 0.0 && *threshold <= 1.0)
            .ok_or(ConfigError::InvalidWarningThreshold)?,
        Err(_) => defaults.warning_threshold,
    };

    let bucket_by_year = match env::var("QUOTA_BUCKET_BY_YEAR") {
        Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidBucketFlag)?,
        Err(_) => defaults.bucket_by_year,
    };

    Ok(QuotaConfig {
        default_cycle_months,
        default_max_farmers,
        warning_threshold,
        bucket_by_year,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCycleMonths,
    InvalidMaxFarmers,
    InvalidWarningThreshold,
    InvalidBucketFlag,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCycleMonths => {
                write!(f, "QUOTA_DEFAULT_CYCLE_MONTHS must be a positive integer")
            }
            ConfigError::InvalidMaxFarmers => {
                write!(f, "QUOTA_DEFAULT_MAX_FARMERS must be a non-negative integer")
            }
            ConfigError::InvalidWarningThreshold => {
                write!(f, "QUOTA_WARNING_THRESHOLD must be within (0, 1]")
            }
            ConfigError::InvalidBucketFlag => {
                write!(f, "QUOTA_BUCKET_BY_YEAR must be true or false")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
