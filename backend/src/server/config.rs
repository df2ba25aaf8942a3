//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from `CARHIRE_*` environment variables (or the matching CLI
//! flags) and are validated into a [`ServerConfig`] before anything touches
//! the database.

use std::net::SocketAddr;

use carhire::outbound::persistence::DEFAULT_MAX_CONNECTIONS;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

/// Address the HTTP server binds to when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Shortest accepted HS256 signing secret, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Raw settings as provided by the environment.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CARHIRE")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Secret used both to sign and to verify bearer tokens.
    pub jwt_secret: Option<String>,
    /// Email of the bootstrap administrator.
    pub admin_email: Option<String>,
    /// Password of the bootstrap administrator.
    pub admin_password: Option<String>,
    /// Comma-separated list of origins allowed by CORS.
    pub allowed_origins: Option<String>,
    /// Socket address to bind, e.g. `0.0.0.0:3000`.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

/// Configuration problems detected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is unset or blank.
    #[error("CARHIRE_{0} must be set")]
    Missing(&'static str),
    /// The signing secret is too short.
    #[error("CARHIRE_JWT_SECRET must be at least {MIN_JWT_SECRET_BYTES} bytes")]
    WeakSecret,
    /// Only one of the admin email and password was given.
    #[error("CARHIRE_ADMIN_EMAIL and CARHIRE_ADMIN_PASSWORD must be set together")]
    PartialAdmin,
    /// The listen address could not be parsed.
    #[error("CARHIRE_BIND_ADDR is not a socket address: {0}")]
    BindAddr(String),
}

/// Credentials of the administrator created at startup.
pub struct AdminCredentials {
    /// Login email of the bootstrap admin.
    pub email: String,
    /// Plain-text password, wiped on drop.
    pub password: Zeroizing<String>,
}

/// Validated server configuration.
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// HS256 signing secret.
    pub jwt_secret: Zeroizing<String>,
    /// Administrator to provision at startup, if any.
    pub admin: Option<AdminCredentials>,
    /// Browser origins allowed by CORS; `*` allows any.
    pub allowed_origins: Vec<String>,
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Connection pool size.
    pub db_max_connections: u32,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

impl TryFrom<AppSettings> for ServerConfig {
    type Error = ConfigError;

    fn try_from(settings: AppSettings) -> Result<Self, Self::Error> {
        let database_url =
            non_blank(settings.database_url).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = Zeroizing::new(
            non_blank(settings.jwt_secret).ok_or(ConfigError::Missing("JWT_SECRET"))?,
        );
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::WeakSecret);
        }
        let admin = match (
            non_blank(settings.admin_email),
            non_blank(settings.admin_password),
        ) {
            (Some(email), Some(password)) => Some(AdminCredentials {
                email,
                password: Zeroizing::new(password),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialAdmin),
        };
        let bind_raw = non_blank(settings.bind_addr).unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind_raw.clone()))?;

        Ok(Self {
            database_url,
            jwt_secret,
            admin,
            allowed_origins: parse_origins(settings.allowed_origins.as_deref()),
            bind_addr,
            db_max_connections: settings
                .db_max_connections
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        })
    }
}
