use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to read users file: {0}")]
    UsersFile(#[from] config::ConfigError),
}

/// Which store backend serves books, tokens and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "sql" => Some(Self::Postgres),
            "memory" | "in-memory" | "inmemory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub token_expiration_secs: u64,
    pub token_cleanup_interval_secs: u64,
    pub users_file: String,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::default(),
            database_url: database_url_from_parts(&|_: &str| None),
            db_max_connections: 10,
            server_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            server_port: 8080,
            token_expiration_secs: 24 * 3600,
            token_cleanup_interval_secs: 3600,
            users_file: "config.yaml".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for every unset key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => StorageBackend::parse(&value).ok_or(ConfigError::Invalid {
                key: "STORAGE_BACKEND",
                value,
            })?,
            None => defaults.storage_backend,
        };

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| database_url_from_parts(&lookup));

        // TOKEN_EXPIRATION is given in hours, optionally suffixed with `h`.
        let token_expiration_secs = match lookup("TOKEN_EXPIRATION") {
            Some(value) => {
                parse_expiration_secs(&value).ok_or(ConfigError::Invalid {
                    key: "TOKEN_EXPIRATION",
                    value,
                })?
            }
            None => defaults.token_expiration_secs,
        };

        let server_host = match lookup("SERVER_HOST") {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::Invalid {
                    key: "SERVER_HOST",
                    value,
                })?,
            None => defaults.server_host,
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Config {
            storage_backend,
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            server_host,
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            token_expiration_secs,
            token_cleanup_interval_secs: parse_or(
                &lookup,
                "TOKEN_CLEANUP_INTERVAL",
                defaults.token_cleanup_interval_secs,
            )?,
            users_file: lookup("USERS_FILE").unwrap_or(defaults.users_file),
            bcrypt_cost,
        })
    }

    pub fn token_expiration(&self) -> TimeDelta {
        i64::try_from(self.token_expiration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }

    pub fn token_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.token_cleanup_interval_secs.max(1))
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Hours to seconds. `None` unless a token issued now would expire at a
/// representable instant.
fn parse_expiration_secs(value: &str) -> Option<u64> {
    let hours: u64 = value.trim().trim_end_matches('h').parse().ok()?;
    let secs = hours.checked_mul(3600)?;
    let ttl = TimeDelta::try_seconds(i64::try_from(secs).ok()?)?;
    Utc::now().checked_add_signed(ttl)?;
    Some(secs)
}

fn database_url_from_parts(lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let part = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        part("DB_USER", "postgres"),
        part("DB_PASSWORD", "password"),
        part("DB_HOST", "localhost"),
        part("DB_PORT", "5432"),
        part("DB_NAME", "bookdb"),
        part("DB_SSLMODE", "disable"),
    )
}

/// A login account declared in the users file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserSeed {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "UserSeed::default_role")]
    pub role: String,
}

impl UserSeed {
    fn default_role() -> String {
        "user".to_string()
    }

    fn new(username: &str, password: &str, email: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserSeed>,
}

/// The two accounts every fresh installation starts with.
pub fn default_user_seeds() -> Vec<UserSeed> {
    vec![
        UserSeed::new("admin", "admin123", "admin@example.com", "admin"),
        UserSeed::new("user", "user123", "user@example.com", "user"),
    ]
}

/// Reads `users:` from a YAML file. A missing file yields an empty list.
pub fn load_user_seeds(path: impl AsRef<Path>) -> Result<Vec<UserSeed>, ConfigError> {
    let path = path.as_ref();
    let file = config::File::new(&path.to_string_lossy(), config::FileFormat::Yaml).required(false);

    let parsed: UsersFile = config::Config::builder()
        .add_source(file)
        .build()?
        .try_deserialize()?;

    Ok(parsed.users)
}

/// Users from the file when it declares any, otherwise the default accounts.
pub fn user_seeds_or_default(path: impl AsRef<Path>) -> Vec<UserSeed> {
    let path = path.as_ref();
    match load_user_seeds(path) {
        Ok(seeds) if !seeds.is_empty() => {
            tracing::info!("Loaded {} users from {}", seeds.len(), path.display());
            seeds
        }
        Ok(_) => {
            tracing::info!("No users declared in {}, using default accounts", path.display());
            default_user_seeds()
        }
        Err(e) => {
            tracing::warn!("Could not load {}: {}, using default accounts", path.display(), e);
            default_user_seeds()
        }
    }
}
