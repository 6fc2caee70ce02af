use std::{io::Error, path::PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::{config, error::AnalyzerError, spotify, types::Token};

/// Seconds before the reported expiry at which a token is considered stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token cache I/O failed: {0}")]
    IoError(#[from] Error),
    #[error("token cache is corrupt: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, TokenError> {
        let content = async_fs::read_to_string(Self::token_path()).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and re-persisting it when stale.
    pub async fn get_valid_token(&mut self) -> Result<String, AnalyzerError> {
        if self.is_expired(Utc::now().timestamp() as u64) {
            let mut fresh = spotify::auth::refresh_token(&self.token.refresh_token).await?;
            // Spotify may omit the refresh token when it does not rotate it.
            if fresh.refresh_token.is_empty() {
                fresh.refresh_token = self.token.refresh_token.clone();
            }
            self.token = fresh;
            if let Err(e) = self.persist().await {
                crate::warning!("Failed to update token cache: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
