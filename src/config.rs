//! Runtime configuration read from the process environment.
//!
//! `main.rs` loads `.env` (if any) through `dotenvy`, then calls
//! [`load_from_env`], which parses and validates everything up front so a bad
//! setting stops the process before it binds a socket.
//!
//! # Storage
//!
//! `STORAGE_BACKEND=postgres` (default) needs either `DATABASE_URL` or the
//! `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME` parts.
//! `STORAGE_BACKEND=memory` keeps records in the process and needs nothing.
//!
//! # Cache
//!
//! Redirect caching turns on when `REDIS_URL` or `REDIS_HOST` is set
//! (`REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB` refine the latter).
//!
//! # Everything else
//!
//! | Variable | Default |
//! |---|---|
//! | `LISTEN` | `0.0.0.0:3000` |
//! | `BASE_URL` | `http://localhost:3000/u` |
//! | `RUST_LOG` | `info` |
//! | `LOG_FORMAT` | `text` (`json` also accepted) |
//! | `CACHE_TTL_SECONDS` | `3600` |
//! | `CODE_LENGTH` / `CODE_MAX_LENGTH` | `8` / `12` |
//! | `EXPECTED_RECORDS` | `1000000` |
//! | `AUDIT_ACTOR` | `system` |
//! | `DB_MAX_CONNECTIONS` / `DB_CONNECT_TIMEOUT` / `DB_IDLE_TIMEOUT` / `DB_MAX_LIFETIME` | `10` / `30` / `600` / `1800` |

use anyhow::{Context, Result, bail};
use std::env;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::utils::code_generator::{
    DEFAULT_CODE_LENGTH, DEFAULT_MAX_CODE_LENGTH, DIGEST_CODE_LENGTH, MIN_CODE_LENGTH,
    collision_probability,
};

/// Where URL records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("unknown STORAGE_BACKEND '{other}', expected 'postgres' or 'memory'"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        })
    }
}

/// `PgPool` tuning. Timeouts are in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Set whenever `storage_backend` is [`StorageBackend::Postgres`].
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub listen_addr: String,
    /// Prefix that short codes are appended to.
    pub base_url: String,
    pub log_level: String,
    pub log_format: String,
    pub cache_ttl_seconds: u64,
    pub code_length: usize,
    pub code_max_length: usize,
    /// Corpus size the startup collision estimate is computed for.
    pub expected_records: u64,
    /// Written to `created_by` and `modified_by` on every new record.
    pub audit_actor: String,
    pub pool: PoolConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Postgres,
            database_url: None,
            redis_url: None,
            listen_addr: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000/u".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            cache_ttl_seconds: 3600,
            code_length: DEFAULT_CODE_LENGTH,
            code_max_length: DEFAULT_MAX_CODE_LENGTH,
            expected_records: 1_000_000,
            audit_actor: "system".to_string(),
            pool: PoolConfig::default(),
        }
    }
}

impl Config {
    /// Reads every setting, falling back to [`Config::default`] values.
    ///
    /// # Errors
    ///
    /// Fails on an unknown `STORAGE_BACKEND`, on a number that does not
    /// parse, or when postgres is selected without connection settings.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.storage_backend,
        };

        let database_url = match storage_backend {
            StorageBackend::Postgres => {
                Some(database_url_from_env().context("database is not configured")?)
            }
            StorageBackend::Memory => None,
        };

        Ok(Self {
            storage_backend,
            database_url,
            redis_url: redis_url_from_env()?,
            listen_addr: env_or("LISTEN", defaults.listen_addr),
            base_url: env_or("BASE_URL", defaults.base_url),
            log_level: env_or("RUST_LOG", defaults.log_level),
            log_format: env_or("LOG_FORMAT", defaults.log_format),
            cache_ttl_seconds: env_parse("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds)?,
            code_length: env_parse("CODE_LENGTH", defaults.code_length)?,
            code_max_length: env_parse("CODE_MAX_LENGTH", defaults.code_max_length)?,
            expected_records: env_parse("EXPECTED_RECORDS", defaults.expected_records)?,
            audit_actor: env_or("AUDIT_ACTOR", defaults.audit_actor),
            pool: PoolConfig {
                max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.pool.max_connections)?,
                connect_timeout: env_parse("DB_CONNECT_TIMEOUT", defaults.pool.connect_timeout)?,
                idle_timeout: env_parse("DB_IDLE_TIMEOUT", defaults.pool.idle_timeout)?,
                max_lifetime: env_parse("DB_MAX_LIFETIME", defaults.pool.max_lifetime)?,
            },
        })
    }

    /// Checks cross-field constraints and value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first setting found to be invalid.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.log_format.as_str(), "text" | "json") {
            bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", self.log_format);
        }

        if self.listen_addr.rsplit_once(':').is_none() {
            bail!("LISTEN must look like 'host:port', got '{}'", self.listen_addr);
        }

        ensure_scheme("BASE_URL", &self.base_url, &["http", "https"])?;

        match (self.storage_backend, &self.database_url) {
            (StorageBackend::Postgres, None) => {
                bail!("the postgres storage backend needs DATABASE_URL")
            }
            (StorageBackend::Postgres, Some(url)) => {
                ensure_scheme("DATABASE_URL", url, &["postgres", "postgresql"])?
            }
            (StorageBackend::Memory, _) => {}
        }

        if let Some(url) = &self.redis_url {
            ensure_scheme("REDIS_URL", url, &["redis", "rediss"])?;
        }

        if self.cache_ttl_seconds == 0 {
            bail!("CACHE_TTL_SECONDS must be positive");
        }

        if !(MIN_CODE_LENGTH..=DIGEST_CODE_LENGTH).contains(&self.code_length) {
            bail!(
                "CODE_LENGTH must lie in {MIN_CODE_LENGTH}..={DIGEST_CODE_LENGTH}, got {}",
                self.code_length
            );
        }

        if !(self.code_length..=DIGEST_CODE_LENGTH).contains(&self.code_max_length) {
            bail!(
                "CODE_MAX_LENGTH must lie in {}..={DIGEST_CODE_LENGTH}, got {}",
                self.code_length,
                self.code_max_length
            );
        }

        if self.audit_actor.trim().is_empty() {
            bail!("AUDIT_ACTOR must not be blank");
        }

        if self.pool.max_connections == 0 || self.pool.connect_timeout == 0 {
            bail!("DB_MAX_CONNECTIONS and DB_CONNECT_TIMEOUT must be positive");
        }

        Ok(())
    }

    /// Logs the effective settings with credentials masked.
    pub fn print_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  listen      {}", self.listen_addr);
        tracing::info!("  base url    {}", self.base_url);
        tracing::info!("  storage     {}", self.storage_backend);
        if let Some(url) = &self.database_url {
            tracing::info!("  database    {}", mask_connection_string(url));
        }
        match &self.redis_url {
            Some(url) => tracing::info!("  redis       {}", mask_connection_string(url)),
            None => tracing::info!("  redis       disabled"),
        }
        tracing::info!("  logging     {} ({})", self.log_level, self.log_format);
        tracing::info!(
            "  codes       {}..={} chars, P(collision) at {} records = {:.2e}",
            self.code_length,
            self.code_max_length,
            self.expected_records,
            collision_probability(self.expected_records, self.code_length)
        );
    }
}

/// Parses, then validates, the environment.
///
/// Expects `.env` to have been loaded already.
///
/// # Errors
///
/// See [`Config::from_env`] and [`Config::validate`].
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn ensure_scheme(key: &str, value: &str, schemes: &[&str]) -> Result<()> {
    let parsed = Url::parse(value)
        .with_context(|| format!("{key} is not a URL: '{}'", mask_connection_string(value)))?;

    if !schemes.contains(&parsed.scheme()) {
        bail!(
            "{key} must use one of {:?}, got '{}'",
            schemes,
            parsed.scheme()
        );
    }

    Ok(())
}

/// `DATABASE_URL`, or a URL assembled from the `DB_*` parts.
fn database_url_from_env() -> Result<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let required = |key: &str| env::var(key).with_context(|| format!("set DATABASE_URL or {key}"));

    let host = env_or("DB_HOST", "localhost".to_string());
    let port = env_or("DB_PORT", "5432".to_string());
    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;
    let name = required("DB_NAME")?;

    let mut url = Url::parse(&format!("postgres://{host}:{port}"))
        .context("DB_HOST or DB_PORT is malformed")?;
    // The setters only fail for URLs without a host.
    let _ = url.set_username(&user);
    let _ = url.set_password(Some(&password));
    url.set_path(&format!("/{name}"));

    Ok(url.to_string())
}

/// `REDIS_URL`, a URL assembled from the `REDIS_*` parts, or `None`
/// when neither is present.
fn redis_url_from_env() -> Result<Option<String>> {
    if let Ok(url) = env::var("REDIS_URL") {
        return Ok(Some(url));
    }

    let Ok(host) = env::var("REDIS_HOST") else {
        return Ok(None);
    };
    let port = env_or("REDIS_PORT", "6379".to_string());
    let db = env_or("REDIS_DB", "0".to_string());

    let mut url = Url::parse(&format!("redis://{host}:{port}"))
        .context("REDIS_HOST or REDIS_PORT is malformed")?;
    if let Ok(password) = env::var("REDIS_PASSWORD")
        && !password.is_empty()
    {
        let _ = url.set_password(Some(&password));
    }
    url.set_path(&format!("/{db}"));

    Ok(Some(url.to_string()))
}

/// Hides the password of a connection URL. Input that does not parse or has
/// no password comes back unchanged.
pub fn mask_connection_string(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => raw.to_string(),
    }
}
