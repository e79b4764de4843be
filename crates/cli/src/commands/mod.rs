//! CLI command implementations.

pub mod carts;
pub mod products;

use std::path::{Path, PathBuf};

use shelf_server::config::{ConfigError, ShelfConfig};
use shelf_server::db::{Collections, RepositoryError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading or writing a collection failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Input file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input file is not a JSON array of products.
    #[error("Cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An entry of the input file is missing required fields.
    #[error("Entry {index} in {}: {message}", path.display())]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

impl CommandError {
    fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Open the collections the server would use, optionally in another directory.
///
/// # Errors
///
/// Returns `CommandError::Config` if the `SHELF_*` variables are invalid.
pub fn open_collections(data_dir: Option<PathBuf>) -> Result<Collections, CommandError> {
    let mut config = ShelfConfig::from_env()?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }

    tracing::debug!(data_dir = %config.data_dir.display(), "Opening collections");
    Ok(config.collections())
}
