use tabled::Table;

use crate::{
    analysis::{self, Scope},
    error, info,
    types::{SimilarityTableRow, TimeWindow, WindowMetricTableRow},
};

use super::{fetch_records, load_session};

pub async fn similarity(limit: u32) {
    let session = load_session().await;
    let records = match fetch_records(&session, Scope::AllWindows, limit).await {
        Ok(records) => records,
        Err(e) => error!("Cannot load tracks. Err: {}", e),
    };

    let rows = analysis::genre_similarity(&records);
    if rows.is_empty() {
        info!("Need at least two time ranges with tracks to compare.");
        return;
    }

    let table_rows: Vec<SimilarityTableRow> = rows
        .iter()
        .map(|r| SimilarityTableRow {
            first: r.window_a.label().to_string(),
            second: r.window_b.label().to_string(),
            jaccard: format!("{:.3}", r.jaccard),
        })
        .collect();

    println!("{}", Table::new(table_rows));
}

pub async fn profile(window: TimeWindow, limit: u32) {
    let session = load_session().await;
    let records = match fetch_records(&session, Scope::SingleWindow(window), limit).await {
        Ok(records) => records,
        Err(e) => error!("Cannot load tracks. Err: {}", e),
    };

    let profile = match analysis::personality_profile(&records, window) {
        Ok(profile) => profile,
        Err(e) => error!("Cannot build profile. Err: {}", e),
    };

    let table_rows: Vec<WindowMetricTableRow> = profile
        .rows()
        .into_iter()
        .map(|r| WindowMetricTableRow {
            range: window.label().to_string(),
            metric: r.metric.to_string(),
            value: format!("{:.3}", r.value),
        })
        .collect();

    println!("{}", Table::new(table_rows));
    info!("Your listening archetype: {}", profile.archetype());
}
