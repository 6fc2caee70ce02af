use reqwest::Client;

use crate::{error::AnalyzerError, types::Artist};

/// Retrieves a single artist, including its genre list.
///
/// Uses `GET /artists/{id}`. Spotify answers 404 for artists it no longer
/// knows about; that case is returned as `Ok(None)` instead of an error so the
/// enrichment step can fall back to an empty genre list.
///
/// # Errors
///
/// Network failures, non-404 HTTP errors and undecodable bodies are returned as
/// [`AnalyzerError::RemoteFetch`].
pub async fn get_artist(
    client: &Client,
    api_url: &str,
    token: &str,
    artist_id: &str,
) -> Result<Option<Artist>, AnalyzerError> {
    let url = format!("{uri}/artists/{id}", uri = api_url, id = artist_id);
    super::get_json::<Artist>(client, &url, token).await
}
