use jsonwebtoken::Algorithm;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Secret shipped in the defaults; never acceptable outside development.
pub const DEFAULT_JWT_SECRET: &str = "change-me";

/// Longest accepted `JWT_EXPIRES_HOURS` (one year).
pub const MAX_JWT_EXPIRES_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("JWT_SECRET_KEY must not be empty")]
    EmptySecret,

    #[error("JWT_SECRET_KEY must be changed from the default in {0:?}")]
    DefaultSecret(Environment),

    #[error("Unsupported JWT algorithm {0}; expected HS256, HS384 or HS512")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
    pub seed_on_startup: bool,
}

/// Signing configuration handed to the token service at startup
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub lifetime: Duration,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
    pub max_bytes: u64,
    pub backup_count: usize,
}

/// Credentials used when an empty user table gets seeded
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_PATH") {
            self.database.path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_BUSY_TIMEOUT_SECS") {
            self.database.busy_timeout =
                Duration::from_secs(parse_var("DATABASE_BUSY_TIMEOUT_SECS", &v)?);
        }
        if let Ok(v) = env::var("DATABASE_SEED_ON_STARTUP") {
            self.database.seed_on_startup = parse_var("DATABASE_SEED_ON_STARTUP", &v)?;
        }

        // JWT overrides
        if let Ok(v) = env::var("JWT_SECRET_KEY") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ALGORITHM") {
            self.jwt.algorithm = parse_algorithm(&v)?;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_HOURS") {
            self.jwt.lifetime = parse_lifetime_hours(&v)?;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.jwt.audience = v;
        }

        // Logging overrides
        if let Ok(v) = env::var("LOG_LEVEL") {
            self.logging.level = v.to_lowercase();
        }
        if let Ok(v) = env::var("LOG_FILE") {
            self.logging.file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("LOG_MAX_BYTES") {
            self.logging.max_bytes = parse_var("LOG_MAX_BYTES", &v)?;
        }
        if let Ok(v) = env::var("LOG_BACKUP_COUNT") {
            self.logging.backup_count = parse_var("LOG_BACKUP_COUNT", &v)?;
        }

        // Seed overrides
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.seed.admin_username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.seed.admin_password = v;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.environment == Environment::Production && self.jwt.secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::DefaultSecret(self.environment));
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                path: PathBuf::from("asset.db"),
                max_connections: 5,
                busy_timeout: Duration::from_secs(5),
                seed_on_startup: true,
            },
            jwt: JwtConfig {
                secret: DEFAULT_JWT_SECRET.to_string(),
                algorithm: Algorithm::HS256,
                lifetime: Duration::from_secs(24 * 3600),
                issuer: "metcal-api".to_string(),
                audience: "metcal-clients".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: PathBuf::from("logs").join("api.log"),
                max_bytes: 5 * 1024 * 1024, // 5MB
                backup_count: 5,
            },
            seed: SeedConfig {
                admin_username: "admin".to_string(),
                admin_password: "password".to_string(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.seed_on_startup = false;
        config
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Token lifetime in whole hours, between 1 and [`MAX_JWT_EXPIRES_HOURS`]
fn parse_lifetime_hours(value: &str) -> Result<Duration, ConfigError> {
    let hours: u64 = parse_var("JWT_EXPIRES_HOURS", value)?;
    hours
        .checked_mul(3600)
        .filter(|_| (1..=MAX_JWT_EXPIRES_HOURS).contains(&hours))
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            name: "JWT_EXPIRES_HOURS",
            value: value.to_string(),
        })
}

/// Only HMAC algorithms work with a shared secret
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value.trim().to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(ConfigError::UnsupportedAlgorithm(value.to_string())),
    }
}
