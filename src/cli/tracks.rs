use tabled::Table;

use crate::{
    analysis::Scope,
    error, info,
    types::{RecordSet, TimeWindow, TrackTableRow},
    utils,
};

use super::{fetch_records, load_session};

/// Prints the enriched records for a selection, as fetched.
pub async fn tracks(window: Option<TimeWindow>, evolution: bool, limit: u32) {
    let scope = match Scope::from_selection(window, evolution) {
        Ok(scope) => scope,
        Err(e) => error!("{}", e),
    };

    let session = load_session().await;
    let records = match fetch_records(&session, scope, limit).await {
        Ok(records) => records,
        Err(e) => error!("Cannot load tracks. Err: {}", e),
    };

    if records.is_empty() {
        info!("Spotify returned no top tracks for this selection.");
        return;
    }

    println!("{}", Table::new(track_rows(&records)));
}

pub fn track_rows(records: &RecordSet) -> Vec<TrackTableRow> {
    records
        .items()
        .iter()
        .map(|e| TrackTableRow {
            range: e.item.time_window.label().to_string(),
            title: e.item.title.clone(),
            artist: e.item.creator_name.clone(),
            popularity: e.item.popularity,
            length: utils::format_duration(e.item.duration_ms),
            genres: utils::join_genres(&e.genres, 3),
        })
        .collect()
}
