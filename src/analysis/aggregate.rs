//! Window metrics over an enriched [`RecordSet`].
//!
//! Every metric runs either for one window ([`Scope::SingleWindow`]) or, in
//! evolution mode ([`Scope::AllWindows`]), once per window present in the
//! input, concatenated in first-seen window order. Metrics that need data
//! return [`AnalyzerError::EmptyWindow`] rather than a default value.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    error::AnalyzerError,
    types::{EnrichedItem, RecordSet, TimeWindow},
};

/// Which windows a metric is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    SingleWindow(TimeWindow),
    AllWindows,
}

impl Scope {
    /// Resolves an operator selection of "a window" or "evolution".
    ///
    /// Exactly one of the two must be given. Nothing is computed here, so a
    /// conflicting selection fails before any data is looked at.
    pub fn from_selection(window: Option<TimeWindow>, evolution: bool) -> Result<Self, AnalyzerError> {
        match (window, evolution) {
            (Some(_), true) => Err(AnalyzerError::InvalidArgument(
                "cannot combine a time range with evolution mode, choose one".to_string(),
            )),
            (Some(window), false) => Ok(Scope::SingleWindow(window)),
            (None, true) => Ok(Scope::AllWindows),
            (None, false) => Err(AnalyzerError::InvalidArgument(
                "a time range is required when evolution mode is off".to_string(),
            )),
        }
    }

    pub fn is_evolution(&self) -> bool {
        matches!(self, Scope::AllWindows)
    }

    /// Windows this scope covers for the given records.
    pub fn windows(&self, records: &RecordSet) -> Vec<TimeWindow> {
        match self {
            Scope::SingleWindow(window) => vec![*window],
            Scope::AllWindows => records.windows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoyaltyRow {
    pub time_window: TimeWindow,
    pub unique_artists: usize,
    pub total_items: usize,
    pub loyalty_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityRow {
    pub time_window: TimeWindow,
    pub genre_entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationRow {
    pub time_window: TimeWindow,
    pub avg_duration_min: f64,
}

/// Genres ranked by number of occurrences.
///
/// Ties keep the order in which genres were first encountered. `top_n`
/// truncates each window's ranking. Rows carry their window only in evolution
/// mode. An empty window simply contributes no rows.
pub fn top_genres(records: &RecordSet, scope: Scope, top_n: Option<usize>) -> Vec<GenreCount> {
    let mut rows = Vec::new();

    for window in scope.windows(records) {
        let mut counts = count_genres(records.in_window(window));
        // stable: equal counts stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(n) = top_n {
            counts.truncate(n);
        }

        rows.extend(counts.into_iter().map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
            time_window: scope.is_evolution().then_some(window),
        }));
    }

    rows
}

/// Distinct artists per window and `1 - unique_artists / total_items`.
pub fn artist_loyalty(records: &RecordSet, scope: Scope) -> Result<Vec<LoyaltyRow>, AnalyzerError> {
    per_window(records, scope, |window, items| {
        if items.is_empty() {
            return Err(AnalyzerError::EmptyWindow {
                metric: "artist loyalty",
                window,
            });
        }

        let unique_artists = items
            .iter()
            .map(|e| e.item.creator_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_items = items.len();

        Ok(LoyaltyRow {
            time_window: window,
            unique_artists,
            total_items,
            loyalty_ratio: 1.0 - unique_artists as f64 / total_items as f64,
        })
    })
}

/// Shannon entropy (natural log) of genre occurrences per window.
///
/// Items without genres contribute nothing; a window without any genre
/// occurrence is an error.
pub fn genre_diversity(
    records: &RecordSet,
    scope: Scope,
) -> Result<Vec<DiversityRow>, AnalyzerError> {
    per_window(records, scope, |window, items| {
        let counts = count_genres(items.iter().copied());
        let genre_entropy = entropy(counts.iter().map(|(_, c)| *c)).ok_or(
            AnalyzerError::EmptyWindow {
                metric: "genre diversity",
                window,
            },
        )?;

        Ok(DiversityRow {
            time_window: window,
            genre_entropy,
        })
    })
}

/// Mean track length per window, in minutes.
pub fn average_duration(
    records: &RecordSet,
    scope: Scope,
) -> Result<Vec<DurationRow>, AnalyzerError> {
    per_window(records, scope, |window, items| {
        if items.is_empty() {
            return Err(AnalyzerError::EmptyWindow {
                metric: "average duration",
                window,
            });
        }

        let total_ms: u64 = items.iter().map(|e| e.item.duration_ms).sum();
        let mean_ms = total_ms as f64 / items.len() as f64;

        Ok(DurationRow {
            time_window: window,
            avg_duration_min: mean_ms / 60_000.0,
        })
    })
}

/// Occurrence count per genre, in first-seen order.
pub(crate) fn count_genres<'a>(
    items: impl Iterator<Item = &'a EnrichedItem>,
) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for genre in items.flat_map(|e| e.genres.iter()) {
        match index.get(genre.as_str()) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(genre.as_str(), counts.len());
                counts.push((genre.as_str(), 1));
            }
        }
    }

    counts
}

/// Shannon entropy in nats; `None` for an empty distribution.
pub(crate) fn entropy(counts: impl Iterator<Item = usize>) -> Option<f64> {
    let counts: Vec<usize> = counts.filter(|c| *c > 0).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }

    let total = total as f64;
    let h = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum::<f64>();

    // a single category yields -0.0
    Some(h.max(0.0))
}

fn per_window<T>(
    records: &RecordSet,
    scope: Scope,
    mut metric: impl FnMut(TimeWindow, Vec<&EnrichedItem>) -> Result<T, AnalyzerError>,
) -> Result<Vec<T>, AnalyzerError> {
    scope
        .windows(records)
        .into_iter()
        .map(|window| metric(window, records.in_window(window).collect()))
        .collect()
}
