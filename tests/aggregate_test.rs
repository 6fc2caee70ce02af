use spotalyze::analysis::{
    Scope, artist_loyalty, average_duration, genre_diversity, top_genres,
};
use spotalyze::error::AnalyzerError;
use spotalyze::types::{EnrichedItem, ListenedItem, RecordSet, TimeWindow};

// Helper function to create a test record
fn create_test_item(
    window: TimeWindow,
    artist_id: &str,
    duration_ms: u64,
    genres: &[&str],
) -> EnrichedItem {
    EnrichedItem {
        item: ListenedItem {
            title: format!("Track by {}", artist_id),
            creator_name: format!("Artist {}", artist_id),
            creator_id: artist_id.to_string(),
            item_id: format!("{}_{}", artist_id, duration_ms),
            popularity: 50,
            duration_ms,
            time_window: window,
        },
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

fn short(artist_id: &str, genres: &[&str]) -> EnrichedItem {
    create_test_item(TimeWindow::Short, artist_id, 180_000, genres)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {} to be close to {}",
        actual,
        expected
    );
}

#[test]
fn test_top_genres_example() {
    let records = RecordSet::new(vec![short("a", &["pop"]), short("b", &["pop", "rock"])]);

    let rows = top_genres(&records, Scope::SingleWindow(TimeWindow::Short), None);

    let pairs: Vec<(&str, usize)> = rows.iter().map(|r| (r.genre.as_str(), r.count)).collect();
    assert_eq!(pairs, vec![("pop", 2), ("rock", 1)]);
    assert!(rows.iter().all(|r| r.time_window.is_none()));
}

#[test]
fn test_top_genres_counts_occurrences_not_items() {
    let records = RecordSet::new(vec![
        short("a", &["pop", "dance pop", "edm"]),
        short("b", &[]),
        short("c", &["edm", "house"]),
        create_test_item(TimeWindow::Long, "d", 200_000, &["jazz"]),
    ]);

    let rows = top_genres(&records, Scope::SingleWindow(TimeWindow::Short), None);
    let total: usize = rows.iter().map(|r| r.count).sum();

    // 3 + 0 + 2 occurrences in the short window, long term ignored
    assert_eq!(total, 5);
    assert!(rows.iter().all(|r| r.genre != "jazz"));
}

#[test]
fn test_top_genres_ties_keep_first_occurrence() {
    let records = RecordSet::new(vec![
        short("a", &["indie", "folk"]),
        short("b", &["rock", "folk"]),
        short("c", &["rock", "indie"]),
    ]);

    let rows = top_genres(&records, Scope::SingleWindow(TimeWindow::Short), None);
    let genres: Vec<&str> = rows.iter().map(|r| r.genre.as_str()).collect();

    // all counts equal 2, so first-seen order wins
    assert_eq!(genres, vec!["indie", "folk", "rock"]);

    for pair in rows.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
}

#[test]
fn test_top_genres_truncates_to_top_n() {
    let records = RecordSet::new(vec![
        short("a", &["a", "b", "c"]),
        short("b", &["c", "d", "e"]),
        short("c", &["c", "e", "f"]),
    ]);

    let rows = top_genres(&records, Scope::SingleWindow(TimeWindow::Short), Some(2));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].genre, "c");
    assert_eq!(rows[0].count, 3);
    assert_eq!(rows[1].genre, "e");
}

#[test]
fn test_top_genres_empty_window_is_empty() {
    let records = RecordSet::new(vec![short("a", &["pop"])]);

    let rows = top_genres(&records, Scope::SingleWindow(TimeWindow::Medium), Some(10));

    assert!(rows.is_empty());
}

#[test]
fn test_top_genres_evolution_follows_first_seen_window_order() {
    let records = RecordSet::new(vec![
        create_test_item(TimeWindow::Long, "a", 1, &["soul"]),
        create_test_item(TimeWindow::Short, "b", 1, &["pop", "pop rap"]),
        create_test_item(TimeWindow::Long, "c", 1, &["soul", "funk"]),
    ]);

    let rows = top_genres(&records, Scope::AllWindows, Some(1));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].time_window, Some(TimeWindow::Long));
    assert_eq!(rows[0].genre, "soul");
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[1].time_window, Some(TimeWindow::Short));
    assert_eq!(rows[1].genre, "pop");
}

#[test]
fn test_artist_loyalty_distinct_artists_is_zero() {
    let records = RecordSet::new(vec![short("a", &[]), short("b", &[]), short("c", &[])]);

    let rows = artist_loyalty(&records, Scope::SingleWindow(TimeWindow::Short)).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].unique_artists, 3);
    assert_eq!(rows[0].total_items, 3);
    assert_eq!(rows[0].loyalty_ratio, 0.0);
}

#[test]
fn test_artist_loyalty_ratio() {
    let records = RecordSet::new(vec![
        short("a", &[]),
        short("a", &[]),
        short("a", &[]),
        short("b", &[]),
    ]);

    let rows = artist_loyalty(&records, Scope::SingleWindow(TimeWindow::Short)).unwrap();

    assert_eq!(rows[0].unique_artists, 2);
    assert_close(rows[0].loyalty_ratio, 0.5);
    assert!(rows[0].loyalty_ratio >= 0.0 && rows[0].loyalty_ratio < 1.0);
}

#[test]
fn test_artist_loyalty_empty_window_fails() {
    let records = RecordSet::default();

    let result = artist_loyalty(&records, Scope::SingleWindow(TimeWindow::Long));

    assert!(matches!(
        result,
        Err(AnalyzerError::EmptyWindow {
            window: TimeWindow::Long,
            ..
        })
    ));
}

#[test]
fn test_artist_loyalty_evolution_on_empty_records_is_empty() {
    let rows = artist_loyalty(&RecordSet::default(), Scope::AllWindows).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_genre_diversity_example() {
    let records = RecordSet::new(vec![short("a", &["pop"]), short("b", &["pop", "rock"])]);

    let rows = genre_diversity(&records, Scope::SingleWindow(TimeWindow::Short)).unwrap();

    assert_close(rows[0].genre_entropy, 0.6365);
}

#[test]
fn test_genre_diversity_single_genre_is_zero() {
    let records = RecordSet::new(vec![
        short("a", &["techno"]),
        short("b", &["techno"]),
        short("c", &[]),
    ]);

    let rows = genre_diversity(&records, Scope::SingleWindow(TimeWindow::Short)).unwrap();

    assert_eq!(rows[0].genre_entropy, 0.0);
}

#[test]
fn test_genre_diversity_two_genres_is_positive() {
    let records = RecordSet::new(vec![short("a", &["techno"]), short("b", &["ambient"])]);

    let rows = genre_diversity(&records, Scope::SingleWindow(TimeWindow::Short)).unwrap();

    assert_close(rows[0].genre_entropy, std::f64::consts::LN_2);
}

#[test]
fn test_genre_diversity_without_genres_fails() {
    let records = RecordSet::new(vec![short("a", &[]), short("b", &[])]);

    let result = genre_diversity(&records, Scope::SingleWindow(TimeWindow::Short));

    assert!(matches!(result, Err(AnalyzerError::EmptyWindow { .. })));
}

#[test]
fn test_genre_diversity_evolution_fails_on_any_empty_window() {
    let records = RecordSet::new(vec![
        short("a", &["pop"]),
        create_test_item(TimeWindow::Medium, "b", 1, &[]),
    ]);

    let result = genre_diversity(&records, Scope::AllWindows);

    assert!(matches!(
        result,
        Err(AnalyzerError::EmptyWindow {
            window: TimeWindow::Medium,
            ..
        })
    ));
}

#[test]
fn test_average_duration_in_minutes() {
    let records = RecordSet::new(vec![
        create_test_item(TimeWindow::Medium, "a", 120_000, &[]),
        create_test_item(TimeWindow::Medium, "b", 240_000, &[]),
    ]);

    let rows = average_duration(&records, Scope::SingleWindow(TimeWindow::Medium)).unwrap();

    assert_close(rows[0].avg_duration_min, 3.0);
}

#[test]
fn test_average_duration_order_invariant_and_linear() {
    let durations = [201_000, 187_500, 245_250, 90_000];
    let forward: RecordSet = durations
        .iter()
        .map(|d| create_test_item(TimeWindow::Short, "a", *d, &[]))
        .collect();
    let reversed: RecordSet = durations
        .iter()
        .rev()
        .map(|d| create_test_item(TimeWindow::Short, "a", *d, &[]))
        .collect();
    let doubled: RecordSet = durations
        .iter()
        .map(|d| create_test_item(TimeWindow::Short, "a", d * 2, &[]))
        .collect();

    let scope = Scope::SingleWindow(TimeWindow::Short);
    let a = average_duration(&forward, scope).unwrap()[0].avg_duration_min;
    let b = average_duration(&reversed, scope).unwrap()[0].avg_duration_min;
    let c = average_duration(&doubled, scope).unwrap()[0].avg_duration_min;

    assert_close(a, b);
    assert_close(c, 2.0 * a);
}

#[test]
fn test_average_duration_empty_window_fails() {
    let records = RecordSet::new(vec![short("a", &[])]);

    let result = average_duration(&records, Scope::SingleWindow(TimeWindow::Long));

    assert!(matches!(result, Err(AnalyzerError::EmptyWindow { .. })));
}

#[test]
fn test_scope_from_selection() {
    assert_eq!(
        Scope::from_selection(Some(TimeWindow::Short), false).unwrap(),
        Scope::SingleWindow(TimeWindow::Short)
    );
    assert_eq!(Scope::from_selection(None, true).unwrap(), Scope::AllWindows);

    assert!(matches!(
        Scope::from_selection(Some(TimeWindow::Long), true),
        Err(AnalyzerError::InvalidArgument(_))
    ));
    assert!(matches!(
        Scope::from_selection(None, false),
        Err(AnalyzerError::InvalidArgument(_))
    ));
}

#[test]
fn test_record_set_windows_first_seen() {
    let records = RecordSet::new(vec![
        create_test_item(TimeWindow::Medium, "a", 1, &[]),
        create_test_item(TimeWindow::Short, "b", 1, &[]),
        create_test_item(TimeWindow::Medium, "c", 1, &[]),
    ]);

    assert_eq!(records.windows(), vec![TimeWindow::Medium, TimeWindow::Short]);
    assert_eq!(records.in_window(TimeWindow::Medium).count(), 2);
    assert_eq!(records.in_window(TimeWindow::Long).count(), 0);
}
