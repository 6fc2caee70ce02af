use serde::Serialize;

use crate::{
    charts::{self, ChartSpec},
    error::AnalyzerError,
    spotify::MusicCatalogSession,
    types::RecordSet,
};

use super::{
    Collector, DiversityRow, DurationRow, GenreCount, LoyaltyRow, PersonalityProfile, Scope,
    SimilarityRow, aggregate, enrich, profile,
};

/// All four window metrics for one selection, plus the records they came from.
///
/// Evolution mode adds the pairwise genre similarity of the windows; a single
/// window adds its personality profile.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(skip)]
    pub scope: Scope,
    pub records: RecordSet,
    pub top_genres: Vec<GenreCount>,
    pub loyalty: Vec<LoyaltyRow>,
    pub diversity: Vec<DiversityRow>,
    pub duration: Vec<DurationRow>,
    pub similarity: Vec<SimilarityRow>,
    pub profile: Option<PersonalityProfile>,
}

impl Report {
    /// Collects, enriches and aggregates in one pass.
    ///
    /// Any failure along the way aborts the report; nothing partial is returned.
    pub async fn build<S: MusicCatalogSession>(
        session: &S,
        scope: Scope,
        top_n: Option<usize>,
        limit: u32,
    ) -> Result<Self, AnalyzerError> {
        let items = Collector::new(session).fetch_scope(scope, limit).await?;
        let records = enrich(session, items).await?;
        Self::from_records(records, scope, top_n)
    }

    pub fn from_records(
        records: RecordSet,
        scope: Scope,
        top_n: Option<usize>,
    ) -> Result<Self, AnalyzerError> {
        let top_genres = aggregate::top_genres(&records, scope, top_n);
        let loyalty = aggregate::artist_loyalty(&records, scope)?;
        let diversity = aggregate::genre_diversity(&records, scope)?;
        let duration = aggregate::average_duration(&records, scope)?;

        let (similarity, profile) = match scope {
            Scope::AllWindows => (profile::genre_similarity(&records), None),
            Scope::SingleWindow(window) => (
                Vec::new(),
                Some(profile::personality_profile(&records, window)?),
            ),
        };

        Ok(Self {
            scope,
            records,
            top_genres,
            loyalty,
            diversity,
            duration,
            similarity,
            profile,
        })
    }

    pub fn charts(&self) -> Vec<ChartSpec> {
        let mut specs = vec![
            charts::top_genres_chart(&self.top_genres, self.scope),
            charts::loyalty_chart(&self.loyalty),
            charts::diversity_chart(&self.diversity),
            charts::duration_chart(&self.duration),
        ];
        if !self.similarity.is_empty() {
            specs.push(charts::similarity_chart(&self.similarity));
        }
        if let Some(profile) = &self.profile {
            specs.push(charts::personality_chart(profile));
        }
        specs
    }
}
