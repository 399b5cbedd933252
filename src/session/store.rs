//! Token Persistence
//!
//! A single bearer token kept under a fixed key, readable across restarts.

use std::sync::Mutex;
use thiserror::Error;

/// Fixed storage key for the bearer token
pub const TOKEN_KEY: &str = "auth_token";

/// Persists the bearer credential.
///
/// Written only by the session controller; read by it at startup.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Errors raised by token stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access token file {path:?}: {error}")]
    Io {
        path: std::path::PathBuf,
        error: String,
    },

    #[error("Token storage unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store, used by tests and by clients that never persist
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already present
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .token
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self
            .token
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self
            .token
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))? = None;
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::FileTokenStore;

#[cfg(feature = "native")]
mod file {
    use super::{StoreError, TokenStore, TOKEN_KEY};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    /// Token kept in a single file, `auth_token` in the data directory by default
    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<data_local_dir>/crowdwatch/auth_token`
        pub fn default_path() -> PathBuf {
            dirs::data_local_dir()
                .map(|p| p.join("crowdwatch").join(TOKEN_KEY))
                .unwrap_or_else(|| PathBuf::from(".").join(TOKEN_KEY))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn io_error(&self, e: std::io::Error) -> StoreError {
            StoreError::Io {
                path: self.path.clone(),
                error: e.to_string(),
            }
        }
    }

    impl TokenStore for FileTokenStore {
        fn load(&self) -> Result<Option<String>, StoreError> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) => {
                    let token = content.trim();
                    if token.is_empty() {
                        Ok(None)
                    } else {
                        Ok(Some(token.to_string()))
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(self.io_error(e)),
            }
        }

        fn save(&self, token: &str) -> Result<(), StoreError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }

            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }
            let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

            // mode() only applies on creation; tighten a file left by an older run
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                file.set_permissions(std::fs::Permissions::from_mode(0o600))
                    .map_err(|e| self.io_error(e))?;
            }

            file.write_all(token.as_bytes()).map_err(|e| self.io_error(e))?;

            tracing::debug!(path = ?self.path, "Token persisted");
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            }
        }
    }
}
