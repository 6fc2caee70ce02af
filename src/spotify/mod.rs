//! # Spotify Integration Module
//!
//! The client adapter between spotalyze and the Spotify Web API. Everything the
//! analysis pipeline needs from the catalog goes through the
//! [`MusicCatalogSession`] capability trait; [`SpotifySession`] is the concrete
//! implementation backed by `reqwest` and a cached OAuth token.
//!
//! ## Architecture
//!
//! ```text
//! Analysis Layer (Collector, Enricher)
//!          ↓
//! MusicCatalogSession (trait)
//!          ↓
//! SpotifySession
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     ├── Top Tracks (/me/top/tracks)
//!     └── Artist Metadata (/artists/{id})
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Submodules
//!
//! - [`auth`] - authorization-code flow, code exchange and token refresh
//! - [`tracks`] - the user's top tracks for one time range
//! - [`artists`] - artist lookups, the source of genre metadata
//!
//! ## Error Handling
//!
//! Transport failures and unusable payloads surface as
//! [`AnalyzerError::RemoteFetch`]. The only retries happen here at the HTTP
//! layer:
//! - **502 Bad Gateway**: retried after 10 seconds, at most [`MAX_RETRIES`] times
//! - **429 Too Many Requests**: the `Retry-After` header is honored up to 120
//!   seconds; longer waits fail the request
//!
//! ## Thread Safety
//!
//! A session is created once per process and shared by reference. The token
//! cache sits behind an async mutex so a refresh never races another request.

pub mod artists;
pub mod auth;
pub mod tracks;

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config,
    error::AnalyzerError,
    management::TokenManager,
    types::{TimeWindow, TrackObject},
    warning,
};

/// Retry budget for 502 and short 429 responses.
pub const MAX_RETRIES: u32 = 3;

const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Read access to a music catalog on behalf of one authenticated user.
///
/// Implementations must be safe to share by reference; the pipeline calls them
/// sequentially and never concurrently.
pub trait MusicCatalogSession {
    /// The user's top tracks for `window`, at most `limit` of them.
    fn top_items(
        &self,
        window: TimeWindow,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<TrackObject>, AnalyzerError>> + Send;

    /// Genres attached to a creator. Unknown creators yield an empty list.
    fn genres_for(
        &self,
        creator_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, AnalyzerError>> + Send;
}

/// [`MusicCatalogSession`] backed by the Spotify Web API.
pub struct SpotifySession {
    client: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifySession {
    pub fn new(token_mgr: TokenManager) -> Self {
        Self {
            client: Client::new(),
            api_url: config::spotify_apiurl(),
            tokens: Mutex::new(token_mgr),
        }
    }

    /// Builds a session from the cached token written by `spotalyze auth`.
    pub async fn from_cache() -> Result<Self, AnalyzerError> {
        let token_mgr = TokenManager::load().await.map_err(|e| {
            AnalyzerError::RemoteFetch(format!(
                "no usable token, please run spotalyze auth ({})",
                e
            ))
        })?;
        Ok(Self::new(token_mgr))
    }

    async fn access_token(&self) -> Result<String, AnalyzerError> {
        let mut tokens = self.tokens.lock().await;
        tokens.get_valid_token().await
    }
}

impl MusicCatalogSession for SpotifySession {
    async fn top_items(
        &self,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<TrackObject>, AnalyzerError> {
        let token = self.access_token().await?;
        tracks::get_top_tracks(&self.client, &self.api_url, &token, window, limit).await
    }

    async fn genres_for(&self, creator_id: &str) -> Result<Vec<String>, AnalyzerError> {
        let token = self.access_token().await?;
        let artist = artists::get_artist(&self.client, &self.api_url, &token, creator_id).await?;
        Ok(artist.map(|a| a.genres).unwrap_or_default())
    }
}

/// GETs `url` and decodes the JSON body.
///
/// Returns `Ok(None)` on 404 so callers can decide whether a missing resource is
/// an error. 502 and short 429 responses are retried up to [`MAX_RETRIES`] times.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    token: &str,
) -> Result<Option<T>, AnalyzerError> {
    let mut attempt = 0;

    loop {
        let response = client.get(url).bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if attempt < MAX_RETRIES {
            if status == StatusCode::BAD_GATEWAY {
                attempt += 1;
                sleep(Duration::from_secs(10)).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after <= MAX_RETRY_AFTER_SECS {
                    attempt += 1;
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                warning!(
                    "Spotify asked to retry after {} seconds. Try again later.",
                    retry_after
                );
            }
        }

        let body = response.error_for_status()?.json::<T>().await?;
        return Ok(Some(body));
    }
}
