use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::AnalyzerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// State shared between the `auth` flow and the callback handler.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub state: String,
    pub token: Option<Token>,
}

/// One of the three listening windows Spotify computes top items for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "short_term")]
    Short,
    #[serde(rename = "medium_term")]
    Medium,
    #[serde(rename = "long_term")]
    Long,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Short, TimeWindow::Medium, TimeWindow::Long];

    /// Value of the `time_range` query parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            TimeWindow::Short => "short_term",
            TimeWindow::Medium => "medium_term",
            TimeWindow::Long => "long_term",
        }
    }

    /// Human readable label used in chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Short => "Short Term",
            TimeWindow::Medium => "Medium Term",
            TimeWindow::Long => "Long Term",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for TimeWindow {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "short" | "short_term" => Ok(TimeWindow::Short),
            "medium" | "medium_term" => Ok(TimeWindow::Medium),
            "long" | "long_term" => Ok(TimeWindow::Long),
            other => Err(AnalyzerError::InvalidArgument(format!(
                "unknown time range '{}', expected one of short, medium, long",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A top track as seen in one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenedItem {
    pub title: String,
    pub creator_name: String,
    pub creator_id: String,
    pub item_id: String,
    pub popularity: u32,
    pub duration_ms: u64,
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: ListenedItem,
    pub genres: Vec<String>,
}

/// Enriched items in insertion order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    items: Vec<EnrichedItem>,
}

impl RecordSet {
    pub fn new(items: Vec<EnrichedItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[EnrichedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct windows present, in the order they first appear.
    pub fn windows(&self) -> Vec<TimeWindow> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.item.time_window) {
                seen.push(item.item.time_window);
            }
        }
        seen
    }

    pub fn in_window(&self, window: TimeWindow) -> impl Iterator<Item = &EnrichedItem> {
        self.items
            .iter()
            .filter(move |e| e.item.time_window == window)
    }
}

impl FromIterator<EnrichedItem> for RecordSet {
    fn from_iter<I: IntoIterator<Item = EnrichedItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub range: String,
    pub title: String,
    pub artist: String,
    pub popularity: u32,
    pub length: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct WindowMetricTableRow {
    pub range: String,
    pub metric: String,
    pub value: String,
}

#[derive(Tabled)]
pub struct SimilarityTableRow {
    pub first: String,
    pub second: String,
    pub jaccard: String,
}
