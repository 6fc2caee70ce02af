use std::collections::HashMap;

use crate::{
    error::AnalyzerError,
    spotify::MusicCatalogSession,
    types::{EnrichedItem, ListenedItem, RecordSet},
};

/// Attaches artist genres to every item.
///
/// Each distinct `creator_id` is looked up exactly once, in first-seen order,
/// and the result is shared by all items of that artist. Unknown artists get an
/// empty genre list; transport failures abort the enrichment.
pub async fn enrich<S: MusicCatalogSession>(
    session: &S,
    items: Vec<ListenedItem>,
) -> Result<RecordSet, AnalyzerError> {
    let mut genre_map: HashMap<String, Vec<String>> = HashMap::new();

    for item in &items {
        if genre_map.contains_key(&item.creator_id) {
            continue;
        }
        let genres = session.genres_for(&item.creator_id).await?;
        genre_map.insert(item.creator_id.clone(), genres);
    }

    Ok(items
        .into_iter()
        .map(|item| {
            let genres = genre_map.get(&item.creator_id).cloned().unwrap_or_default();
            EnrichedItem { item, genres }
        })
        .collect())
}
