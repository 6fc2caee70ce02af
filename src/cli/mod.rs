//! # CLI Module
//!
//! The command-line layer of spotalyze. Each command resolves the operator's
//! selection, loads the cached Spotify session, runs the analysis pipeline and
//! prints the result.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth authorization against Spotify, token is cached locally
//! - [`tracks`] - raw data view: enriched top tracks per time range
//! - [`stats`] - top genres, artist loyalty, genre diversity and average track
//!   duration, as tables or as Vega-Lite chart specs
//! - [`similarity`] - pairwise genre similarity between the time ranges
//! - [`profile`] - personality profile and archetype for one time range
//! - [`dashboard`] - serves the interactive dashboard on `SERVER_ADDRESS`
//!
//! ## Selection
//!
//! Window-scoped commands take either `--window <short|medium|long>` or
//! `--evolution`, never both. The check lives in
//! [`Scope::from_selection`](crate::analysis::Scope::from_selection) so the
//! CLI and the dashboard reject the same inputs.
//!
//! ## Error Handling
//!
//! Every failure is fatal for the command: the message is printed with the
//! `error!` macro and the process exits with status 1. Nothing is retried
//! here; HTTP-level retries live in the Spotify client.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotalyze auth                              # Authorize once
//! spotalyze stats --window short --top-n 15  # One time range
//! spotalyze stats --evolution                 # All time ranges side by side
//! spotalyze tracks --window long              # Inspect the raw data
//! spotalyze dashboard                         # Open http://127.0.0.1:8888/
//! ```

mod auth;
mod dashboard;
mod insights;
mod stats;
mod tracks;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    analysis::{Collector, Scope, enrich},
    error::AnalyzerError,
    error,
    spotify::{MusicCatalogSession, SpotifySession},
    types::RecordSet,
};

pub use auth::auth;
pub use dashboard::dashboard;
pub use insights::profile;
pub use insights::similarity;
pub use stats::stats;
pub use tracks::track_rows;
pub use tracks::tracks;

async fn load_session() -> SpotifySession {
    match SpotifySession::from_cache().await {
        Ok(session) => session,
        Err(e) => error!("{}", e),
    }
}

/// Collects and enriches the records for a scope behind a spinner.
async fn fetch_records<S: MusicCatalogSession>(
    session: &S,
    scope: Scope,
    limit: u32,
) -> Result<RecordSet, AnalyzerError> {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    pb.set_message("Fetching top tracks...");
    let items = match Collector::new(session).fetch_scope(scope, limit).await {
        Ok(items) => items,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message(format!("Fetching genres for {} tracks...", items.len()));
    let records = enrich(session, items).await;
    pb.finish_and_clear();
    records
}
