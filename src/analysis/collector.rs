use crate::{
    error::AnalyzerError,
    spotify::MusicCatalogSession,
    types::{ListenedItem, TimeWindow, TrackObject},
    utils::MAX_LIMIT,
};

use super::Scope;

/// Turns catalog responses into [`ListenedItem`]s.
///
/// The session is injected at construction and only borrowed, so one
/// authenticated session can serve any number of collectors.
pub struct Collector<'a, S> {
    session: &'a S,
}

impl<'a, S: MusicCatalogSession> Collector<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// Fetches up to `limit` top tracks for one window.
    ///
    /// `limit` must be within `1..=50`. One catalog call is made. A track
    /// without an id or without a credited artist makes the whole response
    /// unusable and is reported as [`AnalyzerError::RemoteFetch`]; an empty id
    /// counts as missing.
    pub async fn fetch_window(
        &self,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<ListenedItem>, AnalyzerError> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(AnalyzerError::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        let tracks = self.session.top_items(window, limit).await?;
        tracks
            .into_iter()
            .take(limit as usize)
            .map(|track| to_listened_item(track, window))
            .collect()
    }

    /// Fetches short, medium and long term in that order and concatenates them.
    ///
    /// The first failing window aborts the whole fetch.
    pub async fn fetch_all_windows(&self, limit: u32) -> Result<Vec<ListenedItem>, AnalyzerError> {
        let mut items = Vec::new();
        for window in TimeWindow::ALL {
            items.extend(self.fetch_window(window, limit).await?);
        }
        Ok(items)
    }

    /// Fetches whatever a [`Scope`] needs.
    pub async fn fetch_scope(
        &self,
        scope: Scope,
        limit: u32,
    ) -> Result<Vec<ListenedItem>, AnalyzerError> {
        match scope {
            Scope::SingleWindow(window) => self.fetch_window(window, limit).await,
            Scope::AllWindows => self.fetch_all_windows(limit).await,
        }
    }
}

fn to_listened_item(track: TrackObject, window: TimeWindow) -> Result<ListenedItem, AnalyzerError> {
    let item_id = track.id.filter(|id| !id.is_empty()).ok_or_else(|| {
        AnalyzerError::RemoteFetch(format!("track '{}' has no id", track.name))
    })?;

    let artist = track.artists.into_iter().next().ok_or_else(|| {
        AnalyzerError::RemoteFetch(format!("track '{}' has no artist", track.name))
    })?;

    let creator_id = artist.id.filter(|id| !id.is_empty()).ok_or_else(|| {
        AnalyzerError::RemoteFetch(format!(
            "artist '{}' of track '{}' has no id",
            artist.name, track.name
        ))
    })?;

    Ok(ListenedItem {
        title: track.name,
        creator_name: artist.name,
        creator_id,
        item_id,
        popularity: track.popularity,
        duration_ms: track.duration_ms,
        time_window: window,
    })
}
