//! Configuration management for spotalyze.
//!
//! Values come from environment variables, optionally seeded from `.env` files.
//! Lookup order:
//! 1. Process environment variables (highest priority)
//! 2. `.env` file in the local data directory (`<data_local_dir>/spotalyze/.env`)
//! 3. `.env` file in the current working directory
//! 4. Application defaults for the optional endpoint and server settings
//!
//! The three Spotify application credentials are required. The legacy
//! `SPOTIPY_*` variable names are accepted as fallbacks so existing `.env` files
//! keep working.

use std::{env, path::PathBuf};

use crate::error::AnalyzerError;

/// OAuth scope requested during authorization. Top tracks only.
pub const SPOTIFY_SCOPE: &str = "user-top-read";

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `.env` files.
///
/// Creates `<data_local_dir>/spotalyze/` if needed, then loads the `.env` file
/// found there. A missing file is not an error: the working directory `.env`
/// and the process environment are tried as well. `dotenv` never overrides
/// variables that are already set.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use spotalyze::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    dotenv::dotenv().ok();

    Ok(())
}

/// Platform-specific directory holding `.env` and the token cache.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotalyze/`
/// - macOS: `~/Library/Application Support/spotalyze/`
/// - Windows: `%LOCALAPPDATA%/spotalyze/`
///
/// Falls back to `./spotalyze` when the platform reports no data directory.
///
/// # Example
///
/// ```
/// let token_path = config::data_dir().join("cache/token.json");
/// ```
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotalyze");
    path
}

/// Returns the Spotify application client ID.
///
/// Reads `SPOTIFY_CLIENT_ID`, falling back to `SPOTIPY_CLIENT_ID`. The ID is
/// sent in the authorize URL and, together with the secret, as basic auth on
/// token requests.
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidArgument`] naming `SPOTIFY_CLIENT_ID` when
/// neither variable is set or both are blank.
///
/// # Example
///
/// ```
/// let client_id = config::spotify_client_id()?;
/// ```
pub fn spotify_client_id() -> Result<String, AnalyzerError> {
    required(&["SPOTIFY_CLIENT_ID", "SPOTIPY_CLIENT_ID"])
}

/// Returns the Spotify application client secret.
///
/// Reads `SPOTIFY_CLIENT_SECRET`, falling back to `SPOTIPY_CLIENT_SECRET`.
/// The secret is only ever sent to the token endpoint as HTTP basic auth.
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidArgument`] naming `SPOTIFY_CLIENT_SECRET`
/// when neither variable is set or both are blank.
///
/// # Example
///
/// ```
/// let secret = config::spotify_client_secret()?;
/// ```
pub fn spotify_client_secret() -> Result<String, AnalyzerError> {
    required(&["SPOTIFY_CLIENT_SECRET", "SPOTIPY_CLIENT_SECRET"])
}

/// Returns the OAuth redirect URI registered for the application.
///
/// Reads `SPOTIFY_REDIRECT_URI`, falling back to `SPOTIPY_REDIRECT_URI`. It must
/// point at the local callback server, e.g. `http://127.0.0.1:8888/callback`,
/// and match the URI registered in the Spotify developer dashboard exactly.
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidArgument`] naming `SPOTIFY_REDIRECT_URI`
/// when neither variable is set or both are blank.
///
/// # Example
///
/// ```
/// let redirect_uri = config::spotify_redirect_uri()?;
/// assert!(redirect_uri.ends_with("/callback"));
/// ```
pub fn spotify_redirect_uri() -> Result<String, AnalyzerError> {
    required(&["SPOTIFY_REDIRECT_URI", "SPOTIPY_REDIRECT_URI"])
}

/// Address the local callback and dashboard server binds to.
///
/// Reads `SERVER_ADDRESS`; unset or blank values fall back to
/// `127.0.0.1:8888`. The host and port should agree with the redirect URI,
/// otherwise the OAuth callback never reaches the server.
///
/// # Example
///
/// ```
/// let addr = config::server_addr(); // e.g., "127.0.0.1:8888"
/// ```
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Base URL of the Spotify Web API, without a trailing slash.
///
/// Reads `SPOTIFY_API_URL`, defaulting to `https://api.spotify.com/v1`.
/// Overriding it is mostly useful to point the client at a mock server.
///
/// # Example
///
/// ```
/// let url = format!("{}/me/top/tracks", config::spotify_apiurl());
/// ```
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Spotify OAuth authorization endpoint.
///
/// Reads `SPOTIFY_API_AUTH_URL`, defaulting to
/// `https://accounts.spotify.com/authorize`. The browser is sent here at the
/// start of `spotalyze auth`.
pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Spotify OAuth token endpoint.
///
/// Reads `SPOTIFY_API_TOKEN_URL`, defaulting to
/// `https://accounts.spotify.com/api/token`. Used both for the code exchange
/// and for refreshing an expired access token.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

fn required(keys: &[&str]) -> Result<String, AnalyzerError> {
    keys.iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| AnalyzerError::InvalidArgument(format!("{} must be set", keys[0])))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
