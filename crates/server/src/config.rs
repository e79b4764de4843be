//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHELF_HOST` - Bind address (default: 127.0.0.1)
//! - `SHELF_PORT` - Listen port (default: 8080)
//! - `SHELF_DATA_DIR` - Directory holding the collection files (default: `.`)
//! - `SHELF_PRODUCTS_FILE` - Products collection file name (default: `products.json`)
//! - `SHELF_CARTS_FILE` - Carts collection file name (default: `carts.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::db::Collections;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ShelfConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the collection files
    pub data_dir: PathBuf,
    /// Products collection file name inside `data_dir`
    pub products_file: String,
    /// Carts collection file name inside `data_dir`
    pub carts_file: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ShelfConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get_or("SHELF_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHELF_HOST".to_string(), e.to_string()))?;
        let port = get_or("SHELF_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHELF_PORT".to_string(), e.to_string()))?;

        let products_file = get_or("SHELF_PRODUCTS_FILE", "products.json");
        validate_file_name("SHELF_PRODUCTS_FILE", &products_file)?;
        let carts_file = get_or("SHELF_CARTS_FILE", "carts.json");
        validate_file_name("SHELF_CARTS_FILE", &carts_file)?;

        Ok(Self {
            host,
            port,
            data_dir: PathBuf::from(get_or("SHELF_DATA_DIR", ".")),
            products_file,
            carts_file,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Open both collections in the configured data directory.
    #[must_use]
    pub fn collections(&self) -> Collections {
        Collections::open(&self.data_dir, &self.products_file, &self.carts_file)
    }
}

fn validate_file_name(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.contains(['/', '\\']) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be a plain file name (got '{value}')"),
        ));
    }
    Ok(())
}
