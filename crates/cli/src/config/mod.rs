//! # Configuration
//!
//! Database, JWT and repository-provisioner settings read from environment
//! variables.

use std::{env, net::SocketAddr, str::FromStr};

use auth::JwtConfig;
use server::RepositoryConfig;

pub const DEFAULT_JWT_ISSUER: &str = "hackforge";
pub const DEFAULT_JWT_AUDIENCE: &str = "hackforge-api";

/// Database configuration for CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the discrete fields when set
    pub url:      Option<String>,
    /// Database host address
    pub host:     String,
    /// Database port number
    pub port:     u16,
    /// Database name
    pub database: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// SSL mode
    pub ssl_mode: String,
}

/// Errors that can occur when reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The port number could not be parsed as a valid number.
    #[error("Invalid port number: {value}")]
    InvalidPort {
        /// The invalid port value that was provided.
        value: String,
    },

    /// A numeric variable held something else.
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber {
        name:  &'static str,
        value: String,
    },

    /// A required variable is not set.
    #[error("Missing required environment variable: {name}")]
    Missing {
        name: &'static str,
    },
}

impl From<ConfigError> for error::AppError {
    fn from(err: ConfigError) -> Self { error::AppError::config(err.to_string()) }
}

fn var(name: &str) -> Option<String> { env::var(name).ok().filter(|v| !v.trim().is_empty()) }

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => {
            value.trim().parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    name,
                    value,
                }
            })
        },
    }
}

impl DatabaseConfig {
    /// Creates a new DatabaseConfig from environment variables.
    ///
    /// Returns `Err` if any variable has an invalid format.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = var("HACKFORGE_DATABASE_PORT").unwrap_or_else(|| "5432".to_owned());
        let port = port_str.parse::<u16>().map_err(|_e| {
            ConfigError::InvalidPort {
                value: port_str.clone(),
            }
        })?;

        Ok(Self {
            url: var("HACKFORGE_DATABASE_URL"),
            host: var("HACKFORGE_DATABASE_HOST").unwrap_or_else(|| "localhost".to_owned()),
            port,
            database: var("HACKFORGE_DATABASE_NAME").unwrap_or_else(|| "hackforge".to_owned()),
            username: var("HACKFORGE_DATABASE_USER").unwrap_or_else(|| "hackforge".to_owned()),
            password: var("HACKFORGE_DATABASE_PASSWORD").unwrap_or_default(),
            ssl_mode: var("HACKFORGE_DATABASE_SSL_MODE").unwrap_or_else(|| "prefer".to_owned()),
        })
    }

    /// The connection URL for this configuration
    pub fn database_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => build_database_url(self),
        }
    }
}

/// Builds a PostgreSQL URL from the discrete fields.
pub fn build_database_url(config: &DatabaseConfig) -> String {
    let encoded_username = percent_encode_userinfo(&config.username);
    let encoded_password = percent_encode_userinfo(&config.password);
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        encoded_username, encoded_password, config.host, config.port, config.database, config.ssl_mode
    )
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode_userinfo(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut result = String::with_capacity(s.len().saturating_mul(3));
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(char::from(byte));
        }
        else {
            result.push('%');
            result.push(char::from(HEX[usize::from(byte >> 4)]));
            result.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    result
}

/// JWT settings from the environment.
///
/// The secret is required; everything else has a default.
pub fn jwt_config_from_env() -> Result<JwtConfig, ConfigError> {
    let secret = var("HACKFORGE_JWT_SECRET").ok_or(ConfigError::Missing {
        name: "HACKFORGE_JWT_SECRET",
    })?;

    Ok(JwtConfig {
        secret,
        expiration_seconds: parse_var(
            "HACKFORGE_JWT_EXPIRATION_SECONDS",
            JwtConfig::DEFAULT_EXPIRATION_SECONDS,
        )?,
        issuer: var("HACKFORGE_JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_owned()),
        audience: var("HACKFORGE_JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_owned()),
    })
}

/// Repository provisioner settings; an unset URL disables provisioning.
pub fn repository_config_from_env() -> Result<RepositoryConfig, ConfigError> {
    Ok(RepositoryConfig {
        function_url: var("HACKFORGE_REPO_FUNCTION_URL"),
        service_key:  var("HACKFORGE_REPO_FUNCTION_KEY"),
        timeout_secs: parse_var(
            "HACKFORGE_REPO_FUNCTION_TIMEOUT_SECS",
            RepositoryConfig::DEFAULT_TIMEOUT_SECS,
        )?,
    })
}

/// Parses a host and port into a SocketAddr.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    // IPv6 addresses must be wrapped in brackets when appending a port
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}
