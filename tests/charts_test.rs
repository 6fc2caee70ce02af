use serde_json::Value;

use spotalyze::analysis::{
    DiversityRow, DurationRow, GenreCount, LoyaltyRow, PersonalityProfile, Scope, SimilarityRow,
};
use spotalyze::charts::{
    ChartKind, ChartRenderer, FieldKind, TableRenderer, VegaLiteRenderer, diversity_chart,
    duration_chart, loyalty_chart, personality_chart, similarity_chart, top_genres_chart,
};
use spotalyze::types::TimeWindow;

fn create_genre_row(genre: &str, count: usize, window: Option<TimeWindow>) -> GenreCount {
    GenreCount {
        genre: genre.to_string(),
        count,
        time_window: window,
    }
}

#[test]
fn test_top_genres_chart_single_window() {
    let rows = vec![
        create_genre_row("pop", 2, None),
        create_genre_row("rock", 1, None),
    ];

    let chart = top_genres_chart(&rows, Scope::SingleWindow(TimeWindow::Short));

    assert_eq!(chart.kind, ChartKind::HorizontalBar);
    assert_eq!(chart.title, "Top Genres (Short Term)");
    assert_eq!(chart.x.field, "count");
    assert_eq!(chart.y.field, "genre");
    assert!(chart.y.keep_order);
    assert_eq!(chart.data.len(), 2);
    assert_eq!(chart.data[0]["genre"], "pop");
    assert_eq!(chart.data[0]["count"], 2);
    // single-window rows carry no window column
    assert!(chart.data[0].get("time_window").is_none());
}

#[test]
fn test_top_genres_chart_evolution() {
    let rows = vec![
        create_genre_row("pop", 4, Some(TimeWindow::Short)),
        create_genre_row("soul", 3, Some(TimeWindow::Long)),
    ];

    let chart = top_genres_chart(&rows, Scope::AllWindows);

    assert_eq!(chart.kind, ChartKind::GroupedBar);
    assert_eq!(chart.title, "Top Genre Frequency Across Time Ranges");
    assert_eq!(chart.x.field, "genre");
    assert_eq!(chart.y.field, "count");
    let color = chart.color.as_ref().unwrap();
    assert_eq!(color.field, "time_window");
    assert_eq!(color.kind, FieldKind::Nominal);
    assert_eq!(chart.data[1]["time_window"], "long_term");

    // the input rows are only borrowed
    assert_eq!(rows[0].count, 4);
}

#[test]
fn test_window_metric_charts_bind_their_columns() {
    let loyalty = loyalty_chart(&[LoyaltyRow {
        time_window: TimeWindow::Short,
        unique_artists: 30,
        total_items: 50,
        loyalty_ratio: 0.4,
    }]);
    assert_eq!(loyalty.x.field, "time_window");
    assert_eq!(loyalty.y.field, "unique_artists");
    assert_eq!(loyalty.data[0]["loyalty_ratio"], 0.4);

    let diversity = diversity_chart(&[DiversityRow {
        time_window: TimeWindow::Medium,
        genre_entropy: 2.5,
    }]);
    assert_eq!(diversity.y.field, "genre_entropy");
    assert_eq!(diversity.title, "Genre Diversity (Entropy) Over Time");

    let duration = duration_chart(&[DurationRow {
        time_window: TimeWindow::Long,
        avg_duration_min: 3.75,
    }]);
    assert_eq!(duration.y.field, "avg_duration_min");
    assert!(duration.color.is_none());
    assert_eq!(duration.data[0]["time_window"], "long_term");
}

#[test]
fn test_similarity_chart_is_heatmap() {
    let chart = similarity_chart(&[SimilarityRow {
        window_a: TimeWindow::Short,
        window_b: TimeWindow::Long,
        jaccard: 0.25,
    }]);

    assert_eq!(chart.kind, ChartKind::Heatmap);
    assert_eq!(chart.color.as_ref().unwrap().field, "jaccard");

    let doc = VegaLiteRenderer.render(&chart);
    assert_eq!(doc["mark"]["type"], "rect");
}

#[test]
fn test_vega_lite_document() {
    let rows = vec![create_genre_row("pop", 2, None)];
    let chart = top_genres_chart(&rows, Scope::SingleWindow(TimeWindow::Long));

    let doc = chart.to_vega_lite();

    assert_eq!(
        doc["$schema"],
        "https://vega.github.io/schema/vega-lite/v5.json"
    );
    assert_eq!(doc["title"], "Top Genres (Long Term)");
    assert_eq!(doc["mark"]["type"], "bar");
    assert_eq!(doc["encoding"]["x"]["field"], "count");
    assert_eq!(doc["encoding"]["x"]["type"], "quantitative");
    assert_eq!(doc["encoding"]["y"]["sort"], Value::Null);
    assert_eq!(doc["data"]["values"][0]["genre"], "pop");
}

#[test]
fn test_vega_lite_grouped_bar_offsets_by_color() {
    let rows = vec![create_genre_row("pop", 1, Some(TimeWindow::Short))];
    let doc = top_genres_chart(&rows, Scope::AllWindows).to_vega_lite();

    assert_eq!(doc["encoding"]["xOffset"]["field"], "time_window");
    assert_eq!(doc["encoding"]["color"]["field"], "time_window");
}

#[test]
fn test_personality_chart_is_radar() {
    let profile = PersonalityProfile {
        time_window: TimeWindow::Short,
        diversity: 0.9,
        loyalty: 0.1,
        mainstream: 0.3,
        track_length: 0.5,
    };

    let chart = personality_chart(&profile);

    assert_eq!(chart.kind, ChartKind::Radar);
    assert_eq!(chart.title, "Listening Personality (Short Term): Genre Explorer");
    assert_eq!(chart.data.len(), 4);
    assert_eq!(chart.data[0]["metric"], "diversity");

    let doc = chart.to_vega_lite();
    assert_eq!(doc["mark"]["type"], "arc");
    assert_eq!(doc["encoding"]["radius"]["field"], "value");
    assert_eq!(doc["transform"][0]["as"], "slice");
}

#[test]
fn test_table_renderer_lists_bound_columns_first() {
    let rows = vec![
        create_genre_row("pop", 4, Some(TimeWindow::Short)),
        create_genre_row("house", 2, Some(TimeWindow::Medium)),
    ];
    let chart = top_genres_chart(&rows, Scope::AllWindows);

    let table = TableRenderer.render(&chart);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines[0], "Top Genre Frequency Across Time Ranges");
    let header = lines.iter().find(|l| l.contains("genre")).unwrap();
    let genre_pos = header.find("genre").unwrap();
    let count_pos = header.find("count").unwrap();
    let window_pos = header.find("time_window").unwrap();
    assert!(genre_pos < count_pos && count_pos < window_pos);
    assert!(table.contains("house"));
    assert!(table.contains("medium_term"));
}

#[test]
fn test_table_renderer_formats_floats() {
    let chart = diversity_chart(&[DiversityRow {
        time_window: TimeWindow::Short,
        genre_entropy: 0.636514,
    }]);

    let table = TableRenderer.render(&chart);

    assert!(table.contains("0.637"));
}
