//! Flat-file JSON collections.
//!
//! A [`Collection`] is one JSON file holding a whole list of records. Every
//! read loads the entire file; every modification rewrites it.
//!
//! # Locking and atomicity
//!
//! Each collection has a sidecar lock file (`<file>.lock`). Loads take a shared
//! advisory lock on it, modifications take an exclusive one for the whole
//! read-modify-write, so concurrent writers (including the CLI running next to
//! the server) serialize instead of losing updates. The new content is written
//! to a temporary file in the same directory and renamed over the target, so a
//! crash mid-write leaves the previous version intact.
//!
//! A missing (or zero-length) file reads as an empty list. Unparseable content
//! is reported as [`StoreError::Corrupt`] rather than treated as empty.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

/// Errors from reading or writing a collection file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file or its lock could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a JSON list of records.
    #[error("corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be serialized.
    #[error("failed to encode collection {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The blocking file task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Handle to a JSON file holding a list of `T`.
pub struct Collection<T> {
    path: PathBuf,
    lock_path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock_path: self.lock_path.clone(),
            _records: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Create a handle for the collection stored at `path`.
    ///
    /// Nothing is touched on disk until the first load or modify.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        Self {
            path,
            lock_path,
            _records: PhantomData,
        }
    }

    /// Path of the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record in storage order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the file is not a JSON list of `T`,
    /// `StoreError::Io` if it exists but cannot be read.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            let lock = this.open_lock()?;
            FileExt::lock_shared(&lock).map_err(|e| io_error(&this.lock_path, e))?;
            let records = this.read_records();
            let _ = FileExt::unlock(&lock);
            records
        })
        .await?
    }

    /// Run a read-modify-write cycle under the collection's exclusive lock.
    ///
    /// `f` receives the full list. If it returns `Ok`, the (possibly changed)
    /// list is written back; if it returns `Err`, the file is left untouched
    /// and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a `StoreError` (converted into `E`) if
    /// the file cannot be loaded or saved.
    pub async fn modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            let lock = this.open_lock()?;
            FileExt::lock_exclusive(&lock).map_err(|e| io_error(&this.lock_path, e))?;

            let result = this.read_records().map_err(E::from).and_then(|mut records| {
                let outcome = f(&mut records)?;
                this.write_records(&records)?;
                Ok(outcome)
            });

            let _ = FileExt::unlock(&lock);
            result
        })
        .await
        .map_err(|e| E::from(StoreError::from(e)))?
    }

    /// Overwrite the collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the file cannot be written.
    pub async fn replace(&self, records: Vec<T>) -> Result<(), StoreError> {
        self.modify(move |existing| {
            *existing = records;
            Ok::<_, StoreError>(())
        })
        .await
    }

    fn open_lock(&self) -> Result<File, StoreError> {
        if let Some(dir) = self.lock_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| io_error(&self.lock_path, e))
    }

    fn read_records(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_records(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let tmp_path = self
            .path
            .with_file_name(format!(".{}.tmp", Uuid::new_v4()));

        let written = (|| {
            let mut tmp = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp_path)?;
            tmp.write_all(&json)?;
            tmp.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        written.map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            io_error(&self.path, e)
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
