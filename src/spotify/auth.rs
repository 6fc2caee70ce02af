//! Spotify OAuth 2.0 authorization-code flow.
//!
//! `spotalyze auth` sends the user to Spotify's consent page, receives the
//! redirect on the local callback server and trades the code for a token that
//! is cached under the data directory. Later runs only refresh that token; see
//! [`TokenManager`](crate::management::TokenManager).

use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config,
    error::AnalyzerError,
    management::TokenManager,
    server::start_callback_server,
    success,
    types::{AuthState, Token},
    utils, warning,
};

/// How long `auth` waits for the browser round trip.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token.unwrap_or_default(),
            scope: res.scope.unwrap_or_default(),
            expires_in: res.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the OAuth 2.0 authorization-code flow against Spotify.
///
/// The flow:
/// 1. **State**: generates a random `state` value to bind the callback to this run
/// 2. **Server Start**: spawns the local callback server on `SERVER_ADDRESS`
/// 3. **Browser Launch**: opens the authorize URL requesting `user-top-read`
/// 4. **Callback Handling**: the server exchanges the returned code for a token
/// 5. **Token Persistence**: the token is written to the local cache
///
/// If the browser cannot be opened the URL is printed for manual navigation.
///
/// # Arguments
///
/// * `shared_state` - State shared with the callback handler. It carries the
///   expected `state` value in and the exchanged token back out.
///
/// # Errors
///
/// - [`AnalyzerError::InvalidArgument`] when a client credential or the
///   redirect URI is not configured
/// - [`AnalyzerError::RemoteFetch`] when no token arrives within two minutes
///   (denied consent, failed exchange, closed browser) or the token cannot be
///   written to the cache
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tokio::sync::Mutex;
///
/// let shared_state = Arc::new(Mutex::new(None));
/// spotify::auth::auth(shared_state).await?;
/// ```
pub async fn auth(shared_state: Arc<Mutex<Option<AuthState>>>) -> Result<(), AnalyzerError> {
    let state = utils::generate_state();
    let auth_url = authorize_url(&state)?;

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthState { state, token: None });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_callback_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await.ok_or_else(|| {
        AnalyzerError::RemoteFetch("authentication failed or timed out".to_string())
    })?;

    TokenManager::new(token)
        .persist()
        .await
        .map_err(|e| AnalyzerError::RemoteFetch(format!("failed to save token: {}", e)))?;

    success!("Authentication successful!");
    Ok(())
}

/// Builds the Spotify authorize URL for the configured application.
///
/// Query parameters are `client_id`, `response_type=code`, `redirect_uri`,
/// `state` and `scope=user-top-read`, all percent-encoded.
///
/// # Errors
///
/// [`AnalyzerError::InvalidArgument`] when the client ID or redirect URI is
/// missing, or when `SPOTIFY_API_AUTH_URL` is not a valid URL.
///
/// # Example
///
/// ```
/// let url = authorize_url("k3N9x")?;
/// assert!(url.contains("state=k3N9x"));
/// ```
pub fn authorize_url(state: &str) -> Result<String, AnalyzerError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("state", state),
            ("scope", config::SPOTIFY_SCOPE),
        ],
    )
    .map_err(|e| AnalyzerError::InvalidArgument(format!("bad authorize URL: {}", e)))?;

    Ok(url.to_string())
}

/// Polls the shared state once per second until the callback stored a token or
/// [`AUTH_TIMEOUT`] elapsed.
async fn wait_for_token(shared_state: Arc<Mutex<Option<AuthState>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|s| s.token.as_ref()) {
                return Some(token.clone());
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for an access token.
///
/// Client credentials travel as HTTP basic auth, as Spotify requires for the
/// authorization-code grant. The `redirect_uri` sent here must equal the one
/// used in the authorize URL.
///
/// # Arguments
///
/// * `code` - The single-use `code` query parameter of the callback
///
/// # Returns
///
/// A [`Token`] stamped with the current time as `obtained_at`. Spotify always
/// returns a refresh token for this grant.
///
/// # Errors
///
/// - [`AnalyzerError::InvalidArgument`] when credentials are not configured
/// - [`AnalyzerError::RemoteFetch`] on network failures, a non-2xx answer
///   (expired or reused code, mismatched redirect URI) or an undecodable body
///
/// # Example
///
/// ```
/// let token = spotify::auth::exchange_code(&code).await?;
/// TokenManager::new(token).persist().await?;
/// ```
pub async fn exchange_code(code: &str) -> Result<Token, AnalyzerError> {
    let redirect_uri = config::spotify_redirect_uri()?;
    request_token(&[
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri.as_str()),
    ])
    .await
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when it does not, the
/// returned token has an empty `refresh_token` and the caller keeps the old one.
///
/// # Arguments
///
/// * `refresh_token` - Refresh token from the cached [`Token`]
///
/// # Errors
///
/// - [`AnalyzerError::InvalidArgument`] when credentials are not configured
/// - [`AnalyzerError::RemoteFetch`] on network failures, a revoked refresh
///   token (`400 invalid_grant`) or an undecodable body. A revoked token means
///   `spotalyze auth` has to be run again.
///
/// # Example
///
/// ```
/// let fresh = spotify::auth::refresh_token(&cached.refresh_token).await?;
/// println!("valid for {} seconds", fresh.expires_in);
/// ```
pub async fn refresh_token(refresh_token: &str) -> Result<Token, AnalyzerError> {
    request_token(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ])
    .await
}

async fn request_token(form: &[(&str, &str)]) -> Result<Token, AnalyzerError> {
    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .header("Authorization", basic_auth_header()?)
        .form(form)
        .send()
        .await?
        .error_for_status()?;

    let json = res.json::<TokenResponse>().await?;
    Ok(json.into())
}

/// `Basic base64(client_id:client_secret)`.
fn basic_auth_header() -> Result<String, AnalyzerError> {
    let credentials = format!(
        "{}:{}",
        config::spotify_client_id()?,
        config::spotify_client_secret()?
    );
    Ok(format!("Basic {}", STANDARD.encode(credentials)))
}
