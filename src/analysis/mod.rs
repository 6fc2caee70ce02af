//! # Analysis Module
//!
//! The listening-statistics pipeline. Data flows one way:
//!
//! ```text
//! MusicCatalogSession → Collector → enrich → aggregate / profile → charts
//! ```
//!
//! - [`Collector`] pulls top tracks for one or all time windows from an injected
//!   [`MusicCatalogSession`](crate::spotify::MusicCatalogSession).
//! - [`enrich`] attaches artist genres, one lookup per distinct artist.
//! - [`aggregate`] holds the four window metrics (top genres, artist loyalty,
//!   genre diversity, average duration) parameterized over a [`Scope`].
//! - [`profile`] holds the cross-window extensions: Jaccard genre similarity,
//!   the personality profile and the listening archetype derived from it.
//! - [`Report`] runs the whole pipeline for one selection.
//!
//! Everything after the collector is pure and works on an in-memory
//! [`RecordSet`](crate::types::RecordSet).

pub mod aggregate;
mod collector;
mod enricher;
pub mod profile;
mod report;

pub use aggregate::{
    DiversityRow, DurationRow, GenreCount, LoyaltyRow, Scope, artist_loyalty, average_duration,
    genre_diversity, top_genres,
};
pub use collector::Collector;
pub use enricher::enrich;
pub use profile::{
    Archetype, PersonalityProfile, ProfileRow, SimilarityRow, genre_similarity, jaccard_index,
    personality_profile,
};
pub use report::Report;
