//! # Charts Module
//!
//! Turns metric tables into declarative [`ChartSpec`]s. Builders only read
//! their input rows and bind exactly the column names the analysis layer
//! serializes (`genre`, `count`, `time_window`, `unique_artists`,
//! `loyalty_ratio`, `genre_entropy`, `avg_duration_min`, ...).
//!
//! A spec is backend agnostic. Implementations of [`ChartRenderer`] turn it
//! into something displayable: [`VegaLiteRenderer`] emits a Vega-Lite v5
//! document for the dashboard and `--json` output, [`TableRenderer`] prints the
//! underlying rows as a terminal table.

mod render;

use serde::Serialize;
use serde_json::Value;

use crate::analysis::{
    DiversityRow, DurationRow, GenreCount, LoyaltyRow, PersonalityProfile, Scope, SimilarityRow,
};

pub use render::{ChartRenderer, TableRenderer, VegaLiteRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    /// Bars grouped side by side by the color field.
    GroupedBar,
    Heatmap,
    /// Polar area chart: one equal slice per `x` category, radius from `y`.
    Radar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Nominal,
    Quantitative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encoding {
    pub field: String,
    pub kind: FieldKind,
    /// Keep the data order on this axis instead of sorting.
    pub keep_order: bool,
}

impl Encoding {
    pub fn nominal(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Nominal,
            keep_order: false,
        }
    }

    pub fn quantitative(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldKind::Quantitative,
            keep_order: false,
        }
    }

    fn in_data_order(mut self) -> Self {
        self.keep_order = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: Encoding,
    pub y: Encoding,
    pub color: Option<Encoding>,
    pub data: Vec<Value>,
}

impl ChartSpec {
    pub fn to_vega_lite(&self) -> Value {
        VegaLiteRenderer.render(self)
    }
}

/// Horizontal ranking for one window, grouped bars across windows.
pub fn top_genres_chart(rows: &[GenreCount], scope: Scope) -> ChartSpec {
    match scope {
        Scope::AllWindows => ChartSpec {
            kind: ChartKind::GroupedBar,
            title: "Top Genre Frequency Across Time Ranges".to_string(),
            x: Encoding::nominal("genre").in_data_order(),
            y: Encoding::quantitative("count"),
            color: Some(Encoding::nominal("time_window")),
            data: to_data(rows),
        },
        Scope::SingleWindow(window) => ChartSpec {
            kind: ChartKind::HorizontalBar,
            title: format!("Top Genres ({})", window.label()),
            x: Encoding::quantitative("count"),
            y: Encoding::nominal("genre").in_data_order(),
            color: Some(Encoding::quantitative("count")),
            data: to_data(rows),
        },
    }
}

pub fn loyalty_chart(rows: &[LoyaltyRow]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Artist Loyalty Over Time".to_string(),
        x: Encoding::nominal("time_window").in_data_order(),
        y: Encoding::quantitative("unique_artists"),
        color: Some(Encoding::quantitative("loyalty_ratio")),
        data: to_data(rows),
    }
}

pub fn diversity_chart(rows: &[DiversityRow]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Genre Diversity (Entropy) Over Time".to_string(),
        x: Encoding::nominal("time_window").in_data_order(),
        y: Encoding::quantitative("genre_entropy"),
        color: Some(Encoding::quantitative("genre_entropy")),
        data: to_data(rows),
    }
}

pub fn duration_chart(rows: &[DurationRow]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Track Duration (Minutes)".to_string(),
        x: Encoding::nominal("time_window").in_data_order(),
        y: Encoding::quantitative("avg_duration_min"),
        color: None,
        data: to_data(rows),
    }
}

pub fn similarity_chart(rows: &[SimilarityRow]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Heatmap,
        title: "Genre Similarity Between Time Ranges (Jaccard)".to_string(),
        x: Encoding::nominal("window_a").in_data_order(),
        y: Encoding::nominal("window_b").in_data_order(),
        color: Some(Encoding::quantitative("jaccard")),
        data: to_data(rows),
    }
}

pub fn personality_chart(profile: &PersonalityProfile) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Radar,
        title: format!(
            "Listening Personality ({}): {}",
            profile.time_window.label(),
            profile.archetype()
        ),
        x: Encoding::nominal("metric").in_data_order(),
        y: Encoding::quantitative("value"),
        color: Some(Encoding::nominal("metric")),
        data: to_data(&profile.rows()),
    }
}

fn to_data<T: Serialize>(rows: &[T]) -> Vec<Value> {
    rows.iter()
        .filter_map(|row| serde_json::to_value(row).ok())
        .collect()
}
