use spotalyze::analysis::Scope;
use spotalyze::api::{DashboardQuery, escape_html, render_page};
use spotalyze::error::AnalyzerError;
use spotalyze::management::TokenManager;
use spotalyze::types::{TimeWindow, Token, TopTracksResponse};
use spotalyze::utils::*;

// Helper function to create a test token
fn create_test_token(obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "user-top-read".to_string(),
        expires_in,
        obtained_at,
    }
}

fn query(window: Option<&str>, evolution: bool, top_n: Option<usize>) -> DashboardQuery {
    DashboardQuery {
        window: window.map(str::to_string),
        evolution: evolution.then(|| "on".to_string()),
        top_n,
    }
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    // Should be exactly 32 characters
    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated states should be different
    assert_ne!(state, generate_state());
}

#[test]
fn test_parse_time_window_valid_inputs() {
    assert_eq!(parse_time_window("short").unwrap(), TimeWindow::Short);
    assert_eq!(parse_time_window("medium_term").unwrap(), TimeWindow::Medium);
    assert_eq!(parse_time_window("Long-Term").unwrap(), TimeWindow::Long);
    assert_eq!(parse_time_window("  LONG ").unwrap(), TimeWindow::Long);
}

#[test]
fn test_parse_time_window_invalid_inputs() {
    let result = parse_time_window("yearly");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unknown time range 'yearly'"));

    assert!(parse_time_window("").is_err());
}

#[test]
fn test_time_window_wire_names() {
    assert_eq!(TimeWindow::Short.to_string(), "short_term");
    assert_eq!(
        serde_json::to_string(&TimeWindow::Medium).unwrap(),
        "\"medium_term\""
    );
    let parsed: TimeWindow = serde_json::from_str("\"long_term\"").unwrap();
    assert_eq!(parsed, TimeWindow::Long);
    assert_eq!(TimeWindow::Long.label(), "Long Term");
    assert_eq!(
        TimeWindow::ALL,
        [TimeWindow::Short, TimeWindow::Medium, TimeWindow::Long]
    );
}

#[test]
fn test_top_tracks_response_tolerates_missing_fields() {
    let json = r#"{
        "items": [
            {"id": null, "name": "Local File", "duration_ms": 1000},
            {"id": "t1", "name": "Song", "popularity": 42, "duration_ms": 200000,
             "artists": [{"id": "a1", "name": "Artist"}], "explicit": false}
        ],
        "total": 2
    }"#;

    let response: TopTracksResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.items.len(), 2);
    assert!(response.items[0].id.is_none());
    assert!(response.items[0].artists.is_empty());
    assert_eq!(response.items[0].popularity, 0);
    assert_eq!(response.items[1].artists[0].id.as_deref(), Some("a1"));
}

#[test]
fn test_parse_top_n() {
    assert_eq!(parse_top_n("5").unwrap(), 5);
    assert_eq!(parse_top_n(" 20 ").unwrap(), 20);

    assert!(parse_top_n("4").unwrap_err().contains("between 5 and 20"));
    assert!(parse_top_n("21").is_err());
    assert!(parse_top_n("ten").unwrap_err().contains("not a number"));
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(65_000), "1:05");
    assert_eq!(format_duration(210_999), "3:30");
}

#[test]
fn test_join_genres() {
    let genres = vec![
        "pop".to_string(),
        "dance pop".to_string(),
        "edm".to_string(),
    ];

    assert_eq!(join_genres(&genres, 2), "pop,dance pop");
    assert_eq!(join_genres(&genres, 10), "pop,dance pop,edm");
    assert_eq!(join_genres(&[], 3), "");
}

#[test]
fn test_dashboard_query_first_visit_defaults_to_short_term() {
    let params = DashboardQuery::default();

    assert_eq!(params.scope().unwrap(), Scope::SingleWindow(TimeWindow::Short));
    assert_eq!(params.top_n().unwrap(), DEFAULT_TOP_N);
}

#[test]
fn test_dashboard_query_scope() {
    assert_eq!(
        query(Some("medium"), false, Some(10)).scope().unwrap(),
        Scope::SingleWindow(TimeWindow::Medium)
    );
    assert_eq!(
        query(Some(""), true, Some(10)).scope().unwrap(),
        Scope::AllWindows
    );

    // a submitted form with neither choice is rejected
    assert!(matches!(
        query(None, false, Some(10)).scope(),
        Err(AnalyzerError::InvalidArgument(_))
    ));
    assert!(matches!(
        query(Some("short"), true, None).scope(),
        Err(AnalyzerError::InvalidArgument(_))
    ));
    assert!(matches!(
        query(Some("weekly"), false, None).scope(),
        Err(AnalyzerError::InvalidArgument(_))
    ));
}

#[test]
fn test_dashboard_query_top_n_bounds() {
    assert_eq!(query(None, true, Some(5)).top_n().unwrap(), 5);
    assert_eq!(query(None, true, Some(20)).top_n().unwrap(), 20);
    assert!(query(None, true, Some(4)).top_n().is_err());
    assert!(query(None, true, Some(21)).top_n().is_err());
}

#[test]
fn test_token_expiry_margin() {
    let manager = TokenManager::new(create_test_token(1000, 3600));

    assert!(!manager.is_expired(1000));
    assert!(!manager.is_expired(4359));
    // refreshed four minutes before the reported expiry
    assert!(manager.is_expired(4360));
    assert!(manager.is_expired(10_000));
    assert_eq!(manager.current_token().access_token, "access");
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html("<b>Rock & \"Roll\"</b>"),
        "&lt;b&gt;Rock &amp; &quot;Roll&quot;&lt;/b&gt;"
    );
    assert_eq!(escape_html("Guns N' Roses"), "Guns N&#39; Roses");
}

#[test]
fn test_render_page_preselects_parsed_window() {
    let page = render_page(&query(Some("short"), false, Some(12)), "");
    assert!(page.contains("<option value=\"short_term\" selected>Short Term</option>"));
    assert!(!page.contains("<option value=\"\" selected>"));
    assert!(page.contains("value=\"12\""));

    let page = render_page(&query(Some("Long-Term"), false, None), "");
    assert!(page.contains("<option value=\"long_term\" selected>"));

    let page = render_page(&query(None, true, None), "<p>charts</p>");
    assert!(!page.contains(" selected>"));
    assert!(page.contains(" checked>"));
    assert!(page.contains("<p>charts</p>"));
}
