//! Client session storage
//!
//! Holds the bearer token and the UI language preference. The session is an
//! explicit handle passed into every view; when a storage path is configured
//! it is persisted as JSON so a restart keeps the user signed in.

use std::path::PathBuf;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use crate::config::SessionConfig;
use crate::config::validation::is_language_code;
use crate::utils::errors::{ViewError, Result};

/// Persisted session contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: Option<String>,
    pub language: Option<String>,
}

/// Shared session handle
#[derive(Clone)]
pub struct SessionStore {
    data: Arc<RwLock<SessionData>>,
    storage_path: Option<PathBuf>,
    default_language: String,
}

impl SessionStore {
    /// Open the session, restoring it from disk when a file exists
    pub async fn open(config: &SessionConfig) -> Result<Self> {
        let storage_path = config.storage_path.as_ref().map(PathBuf::from);

        let data = match &storage_path {
            Some(path) => match tokio::fs::read_to_string(path).await {
                Ok(contents) => match serde_json::from_str::<SessionData>(&contents) {
                    Ok(data) => {
                        debug!(path = %path.display(), has_token = data.token.is_some(), "Session restored");
                        data
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                        SessionData::default()
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionData::default(),
                Err(e) => return Err(e.into()),
            },
            None => SessionData::default(),
        };

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            storage_path,
            default_language: config.default_language.clone(),
        })
    }

    /// Session kept in memory only
    pub fn in_memory(default_language: &str) -> Self {
        Self {
            data: Arc::new(RwLock::new(SessionData::default())),
            storage_path: None,
            default_language: default_language.to_string(),
        }
    }

    /// Current bearer token, if signed in
    pub async fn token(&self) -> Option<String> {
        self.data.read().await.token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.data.read().await.token.is_some()
    }

    /// UI language, falling back to the configured default
    pub async fn language(&self) -> String {
        self.data
            .read()
            .await
            .language
            .clone()
            .unwrap_or_else(|| self.default_language.clone())
    }

    /// Store a token after a successful login
    pub async fn login(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ViewError::Rejected("Session token cannot be empty".to_string()));
        }

        self.data.write().await.token = Some(token);
        info!("Session started");
        self.persist().await
    }

    /// Drop the token; the language preference survives logout
    pub async fn logout(&self) -> Result<()> {
        self.data.write().await.token = None;
        info!("Session ended");
        self.persist().await
    }

    pub async fn set_language(&self, code: &str) -> Result<()> {
        if !is_language_code(code) {
            return Err(ViewError::Rejected(format!("Invalid language code: {}", code)));
        }

        self.data.write().await.language = Some(code.to_string());
        debug!(language = code, "Language preference updated");
        self.persist().await
    }

    /// Snapshot of the session contents
    pub async fn snapshot(&self) -> SessionData {
        self.data.read().await.clone()
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.storage_path else {
            return Ok(());
        };

        let serialized = serde_json::to_string_pretty(&*self.data.read().await)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Sibling temp file, then rename over the session file
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, serialized).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("storage_path", &self.storage_path)
            .field("default_language", &self.default_language)
            .finish_non_exhaustive()
    }
}
