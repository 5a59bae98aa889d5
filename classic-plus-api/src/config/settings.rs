//! Runtime settings read from the environment.

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::errors::StartupError;

/// Default bind address.
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default listen port.
const DEFAULT_PORT: u16 = 8000;

/// Default size of the PostgreSQL connection pool.
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default allowed CORS origin, the local frontend dev server.
const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Default base URL of the Discord REST API.
const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";

/// A configuration value that must never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Where pins, votes and survey entries are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL, migrated on startup.
    Postgres {
        database_url: Secret,
        max_connections: u32,
    },
    /// Process-local state, lost on restart.
    Memory,
}

/// Credentials of the Discord OAuth2 application used for identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordSettings {
    pub client_id: String,
    pub client_secret: Secret,
    pub redirect_uri: String,
    pub api_base: String,
}

/// Complete runtime configuration of the API service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub storage: StorageBackend,
    pub cors_allowed_origins: Vec<HeaderValue>,
    /// Take the voter origin from the first `X-Forwarded-For` hop instead of
    /// the TCP peer. Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    /// Bearer token guarding `POST /admin/reset-db`. The endpoint is disabled
    /// when unset.
    pub admin_token: Option<Secret>,
    /// `None` when the Discord callback is not configured.
    pub discord: Option<DiscordSettings>,
    pub survey_definition_path: Option<PathBuf>,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `HOST`: Bind address (default: 0.0.0.0)
    /// - `PORT`: Listen port (default: 8000)
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL connection string, required for postgres
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: http://localhost:3000)
    /// - `TRUST_FORWARDED_FOR`: "true" to trust `X-Forwarded-For` (default: false)
    /// - `ADMIN_TOKEN`: Enables the admin reset endpoint
    /// - `DISCORD_CLIENT_ID`, `DISCORD_CLIENT_SECRET`, `DISCORD_REDIRECT_URI`:
    ///   Discord OAuth2 application, all or none
    /// - `DISCORD_API_BASE`: Discord API base URL (default: https://discord.com/api)
    /// - `SURVEY_DEFINITION_PATH`: JSON file replacing the built-in survey
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Parsed settings
    /// * `Err(StartupError)` - If a value is missing or malformed
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = match var("HOST") {
            Some(host) => host
                .parse()
                .map_err(|_| StartupError::config(format!("HOST is not an IP address: {host}")))?,
            None => DEFAULT_HOST,
        };
        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;

        let storage = match var("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres {
                database_url: var("DATABASE_URL").map(Secret::new).ok_or_else(|| {
                    StartupError::config("DATABASE_URL must be set for the postgres backend")
                })?,
                max_connections: parse_or(
                    var("DATABASE_MAX_CONNECTIONS"),
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
            },
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(StartupError::config(format!(
                    "STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let cors_allowed_origins = parse_origins(
            &var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string()),
        )?;

        let trust_forwarded_for = match var("TRUST_FORWARDED_FOR") {
            Some(value) => parse_flag(&value, "TRUST_FORWARDED_FOR")?,
            None => false,
        };

        let discord = match (
            var("DISCORD_CLIENT_ID"),
            var("DISCORD_CLIENT_SECRET"),
            var("DISCORD_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(DiscordSettings {
                client_id,
                client_secret: Secret::new(client_secret),
                redirect_uri,
                api_base: var("DISCORD_API_BASE")
                    .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            }),
            (None, None, None) => None,
            _ => {
                return Err(StartupError::config(
                    "DISCORD_CLIENT_ID, DISCORD_CLIENT_SECRET and DISCORD_REDIRECT_URI must be set together",
                ));
            }
        };

        Ok(Self {
            host,
            port,
            storage,
            cors_allowed_origins,
            trust_forwarded_for,
            admin_token: var("ADMIN_TOKEN").map(Secret::new),
            discord,
            survey_definition_path: var("SURVEY_DEFINITION_PATH").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> Result<T, StartupError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| StartupError::config(format!("{key} has an invalid value: {value}"))),
        None => Ok(default),
    }
}

fn parse_flag(value: &str, key: &str) -> Result<bool, StartupError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(StartupError::config(format!("{key} must be true or false, got '{value}'"))),
    }
}

fn parse_origins(value: &str) -> Result<Vec<HeaderValue>, StartupError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(StartupError::config(
                    "CORS_ALLOWED_ORIGINS cannot contain '*' because credentials are allowed",
                ));
            }
            origin
                .trim_end_matches('/')
                .parse::<HeaderValue>()
                .map_err(|_| StartupError::config(format!("Invalid CORS origin: {origin}")))
        })
        .collect()
}
