//! File-backed token persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::TOKEN_FILE_EXT;
use crate::error::{Error, Result};
use crate::token::TokenRecord;

/// File-backed store for a single token record.
///
/// The file lives next to the credentials keyfile, named after it.
/// Independent processes may read and write the same file without
/// coordination; a torn or malformed read is treated like a missing file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    keep_token: bool,
}

impl TokenStore {
    /// Create a store persisting to `path`.
    #[must_use]
    pub const fn new(path: PathBuf, keep_token: bool) -> Self {
        Self { path, keep_token }
    }

    /// Create a store co-located with a credentials keyfile.
    #[must_use]
    pub fn for_keyfile(keyfile: &Path, keep_token: bool) -> Self {
        Self::new(keyfile.with_extension(TOKEN_FILE_EXT), keep_token)
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record.
    ///
    /// A missing or malformed file yields `None`.
    #[must_use]
    pub fn load(&self) -> Option<TokenRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "token file not readable");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => {
                debug!(path = %self.path.display(), "token file read");
                Some(record)
            }
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "token file malformed");
                None
            }
        }
    }

    /// Persist a record. No-op when token keeping is disabled.
    pub fn save(&self, record: &TokenRecord) -> Result<()> {
        if !self.keep_token {
            debug!("token persistence disabled, skipping write");
            return Ok(());
        }
        let contents = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, contents).map_err(|source| Error::TokenFile {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "token file written");
        Ok(())
    }

    /// Remove the persisted record. A missing file counts as success.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token file deleted");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::TokenFile {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
