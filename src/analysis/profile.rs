//! Cross-window extensions: genre similarity, personality profile, archetype.

use std::{collections::HashSet, fmt};

use serde::Serialize;

use crate::{
    error::AnalyzerError,
    types::{RecordSet, TimeWindow},
};

use super::aggregate::{self, Scope, count_genres, entropy};

/// Average track length, in minutes, that maps to a full `track_length` score.
const LONG_TRACK_MINUTES: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityRow {
    pub window_a: TimeWindow,
    pub window_b: TimeWindow,
    pub jaccard: f64,
}

/// `|a ∩ b| / |a ∪ b|`. Two empty sets are identical, hence 1.0.
pub fn jaccard_index(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Pairwise Jaccard similarity of the distinct genre sets of every window
/// present, in first-seen window order.
pub fn genre_similarity(records: &RecordSet) -> Vec<SimilarityRow> {
    let windows = records.windows();
    let sets: Vec<HashSet<&str>> = windows
        .iter()
        .map(|w| {
            records
                .in_window(*w)
                .flat_map(|e| e.genres.iter().map(String::as_str))
                .collect()
        })
        .collect();

    let mut rows = Vec::new();
    for i in 0..windows.len() {
        for j in (i + 1)..windows.len() {
            rows.push(SimilarityRow {
                window_a: windows[i],
                window_b: windows[j],
                jaccard: jaccard_index(&sets[i], &sets[j]),
            });
        }
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub metric: &'static str,
    pub value: f64,
}

/// Four normalized (0..=1) traits describing one window of listening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalityProfile {
    pub time_window: TimeWindow,
    /// Entropy divided by its maximum for the number of distinct genres.
    pub diversity: f64,
    pub loyalty: f64,
    /// Mean popularity over 100.
    pub mainstream: f64,
    pub track_length: f64,
}

impl PersonalityProfile {
    pub fn rows(&self) -> Vec<ProfileRow> {
        vec![
            ProfileRow {
                metric: "diversity",
                value: self.diversity,
            },
            ProfileRow {
                metric: "loyalty",
                value: self.loyalty,
            },
            ProfileRow {
                metric: "mainstream",
                value: self.mainstream,
            },
            ProfileRow {
                metric: "track_length",
                value: self.track_length,
            },
        ]
    }

    pub fn archetype(&self) -> Archetype {
        if self.mainstream >= 0.7 {
            Archetype::ChartChaser
        } else if self.loyalty >= 0.5 {
            Archetype::DevotedFan
        } else if self.diversity >= 0.8 {
            Archetype::GenreExplorer
        } else {
            Archetype::BalancedListener
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Archetype {
    ChartChaser,
    DevotedFan,
    GenreExplorer,
    BalancedListener,
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Archetype::ChartChaser => "Chart Chaser",
            Archetype::DevotedFan => "Devoted Fan",
            Archetype::GenreExplorer => "Genre Explorer",
            Archetype::BalancedListener => "Balanced Listener",
        };
        f.write_str(label)
    }
}

/// Builds the personality profile of one window.
///
/// Unlike [`aggregate::genre_diversity`], a window whose tracks carry no genres
/// is not an error here: its diversity is 0.
pub fn personality_profile(
    records: &RecordSet,
    window: TimeWindow,
) -> Result<PersonalityProfile, AnalyzerError> {
    let scope = Scope::SingleWindow(window);
    let items: Vec<_> = records.in_window(window).collect();
    if items.is_empty() {
        return Err(AnalyzerError::EmptyWindow {
            metric: "personality profile",
            window,
        });
    }

    let counts = count_genres(items.iter().copied());
    let diversity = match (entropy(counts.iter().map(|(_, c)| *c)), counts.len()) {
        (Some(h), distinct) if distinct >= 2 => h / (distinct as f64).ln(),
        _ => 0.0,
    };

    let loyalty = aggregate::artist_loyalty(records, scope)?
        .first()
        .map_or(0.0, |row| row.loyalty_ratio);

    let popularity: u64 = items.iter().map(|e| u64::from(e.item.popularity)).sum();
    let mainstream = (popularity as f64 / items.len() as f64 / 100.0).clamp(0.0, 1.0);

    let minutes = aggregate::average_duration(records, scope)?
        .first()
        .map_or(0.0, |row| row.avg_duration_min);
    let track_length = (minutes / LONG_TRACK_MINUTES).min(1.0);

    Ok(PersonalityProfile {
        time_window: window,
        diversity,
        loyalty,
        mainstream,
        track_length,
    })
}
