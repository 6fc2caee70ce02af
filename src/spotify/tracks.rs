use reqwest::Client;

use crate::{
    error::AnalyzerError,
    types::{TimeWindow, TopTracksResponse, TrackObject},
};

/// Retrieves the authenticated user's top tracks for one time range.
///
/// Calls `GET /me/top/tracks` with `time_range` set from `window` and the given
/// `limit` (Spotify accepts 1-50). The result keeps Spotify's ranking order.
///
/// # Errors
///
/// Any transport or HTTP failure, including a 404, is returned as
/// [`AnalyzerError::RemoteFetch`]. An undecodable body is reported the same way.
///
/// # Example
///
/// ```
/// let tracks = get_top_tracks(&client, api_url, token, TimeWindow::Short, 50).await?;
/// println!("{} tracks", tracks.len());
/// ```
pub async fn get_top_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    window: TimeWindow,
    limit: u32,
) -> Result<Vec<TrackObject>, AnalyzerError> {
    let url = format!(
        "{uri}/me/top/tracks?time_range={range}&limit={limit}",
        uri = api_url,
        range = window.as_api_str(),
        limit = limit
    );

    match super::get_json::<TopTracksResponse>(client, &url, token).await? {
        Some(res) => Ok(res.items),
        None => Err(AnalyzerError::RemoteFetch(format!(
            "top tracks endpoint not found for {}",
            window
        ))),
    }
}
