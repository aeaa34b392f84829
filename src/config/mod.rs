use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::eligibility::EligibilityPolicy;

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
    pub store: StoreConfig,
    pub policy: EligibilityPolicy,
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

        let store = StoreConfig {
            inventory_csv: env::var_os("BLOOD_BANK_INVENTORY_CSV").map(PathBuf::from),
            requests_csv: env::var_os("BLOOD_BANK_REQUESTS_CSV").map(PathBuf::from),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            store,
            policy: load_policy()?,
        })
    }
}

/// Threshold overrides on top of the default screening policy.
fn load_policy() -> Result<EligibilityPolicy, ConfigError> {
    let mut policy = EligibilityPolicy::default();

    if let Some(value) = parse_override("BLOOD_BANK_MIN_AGE")? {
        policy.minimum_age = value;
    }
    if let Some(value) = parse_override("BLOOD_BANK_MAX_AGE")? {
        policy.maximum_age = value;
    }
    if let Some(value) = parse_checked_override("BLOOD_BANK_MIN_WEIGHT_KG", |kg: &f64| {
        kg.is_finite() && *kg >= 0.0
    })? {
        policy.minimum_weight_kg = value;
    }
    if let Some(value) =
        parse_checked_override("BLOOD_BANK_DONATION_INTERVAL_DAYS", |days: &i64| *days >= 0)?
    {
        policy.donation_interval_days = value;
    }

    if policy.minimum_age > policy.maximum_age {
        return Err(ConfigError::InvalidAgeRange {
            minimum: policy.minimum_age,
            maximum: policy.maximum_age,
        });
    }

    Ok(policy)
}

fn parse_override<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPolicyValue { key, value: raw }),
        Err(_) => Ok(None),
    }
}

/// Values that parse but would switch a rule off (NaN, negative) are rejected too.
fn parse_checked_override<T: FromStr>(
    key: &'static str,
    accept: impl Fn(&T) -> bool,
) -> Result<Option<T>, ConfigError> {
    match parse_override(key)? {
        Some(value) if !accept(&value) => Err(ConfigError::InvalidPolicyValue {
            key,
            value: env::var(key).unwrap_or_default(),
        }),
        parsed => Ok(parsed),
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

/// Optional CSV snapshots seeding the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub inventory_csv: Option<PathBuf>,
    pub requests_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPolicyValue { key: &'static str, value: String },
    InvalidAgeRange { minimum: u32, maximum: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPolicyValue { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
            ConfigError::InvalidAgeRange { minimum, maximum } => write!(
                f,
                "minimum donor age {minimum} exceeds maximum donor age {maximum}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPolicyValue { .. }
            | ConfigError::InvalidAgeRange { .. } => None,
        }
    }
}
