use crate::policy::{PolicyConfig, RefundPolicyTier};
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
    pub policy: PolicyConfig,
    pub catalog: CatalogConfig,
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

        let mut policy = PolicyConfig::default();
        if let Ok(raw) = env::var("APP_REFUND_TIERS") {
            policy.refund_tiers = parse_refund_tiers(&raw)?;
        }

        let csv_path = env::var("APP_CATALOG_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            policy,
            catalog: CatalogConfig { csv_path },
        })
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

/// Where the service sources its listings from.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub csv_path: Option<PathBuf>,
}

/// Parse `hours:percent` pairs, e.g. `72:100,48:90,24:75,0:50`.
pub fn parse_refund_tiers(raw: &str) -> Result<Vec<RefundPolicyTier>, ConfigError> {
    let invalid = || ConfigError::InvalidRefundTiers {
        value: raw.to_string(),
    };

    let tiers = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (hours, percent) = entry.split_once(':').ok_or_else(|| invalid())?;
            let min_hours = hours.trim().parse::<f64>().map_err(|_| invalid())?;
            let refund_percentage = percent.trim().parse::<u8>().map_err(|_| invalid())?;
            if !min_hours.is_finite() || min_hours < 0.0 || refund_percentage > 100 {
                return Err(invalid());
            }
            Ok(RefundPolicyTier::new(min_hours, refund_percentage))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if tiers.is_empty() {
        return Err(invalid());
    }
    Ok(tiers)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRefundTiers { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRefundTiers { value } => write!(
                f,
                "APP_REFUND_TIERS must be comma separated hours:percent pairs, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRefundTiers { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
