use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Genre, Movie},
    services::{
        catalog::{CatalogProvider, DEFAULT_MIN_VOTE_COUNT},
        genre_cache::GenreCache,
        random::Randomness,
    },
};

/// Genres and volume for one seeding round.
#[derive(Debug, Clone, Default)]
pub struct SeedPlan {
    /// Genre names dropped from the candidate pool before the random pick.
    pub exclude_genres: Vec<String>,
    pub genres_to_pick: usize,
    pub movies_per_genre: usize,
}

/// Pulls fresh catalog content and persists it through the movie store.
///
/// Seeding is sequential per genre; a provider failure aborts the round and
/// propagates to the caller.
pub struct MovieSeeder {
    catalog: Arc<dyn CatalogProvider>,
    genre_cache: Arc<GenreCache>,
    movies: Arc<dyn MovieStore>,
    random: Arc<dyn Randomness>,
}

impl MovieSeeder {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        genre_cache: Arc<GenreCache>,
        movies: Arc<dyn MovieStore>,
        random: Arc<dyn Randomness>,
    ) -> Self {
        Self {
            catalog,
            genre_cache,
            movies,
            random,
        }
    }

    /// Fetches movies for randomly chosen genres outside the exclusions and
    /// upserts them. Falls back to trending content when every genre query
    /// comes back empty, so a seeding round still produces candidates.
    pub async fn seed_for_genres(&self, plan: &SeedPlan) -> AppResult<Vec<Movie>> {
        let taxonomy = self.genre_cache.get(self.catalog.as_ref()).await?;
        let targets = self.pick_genres(taxonomy, plan);

        let mut drafts = Vec::new();
        for genre in &targets {
            let fetched = self
                .catalog
                .fetch_movies_by_genre(genre, plan.movies_per_genre, DEFAULT_MIN_VOTE_COUNT)
                .await?;
            drafts.extend(fetched);
        }

        if drafts.is_empty() {
            let fallback_limit = plan.genres_to_pick * plan.movies_per_genre;
            tracing::debug!(fallback_limit, "Genre seeding empty, topping up from trending");
            drafts = self.catalog.fetch_trending(fallback_limit).await?;
        }

        self.movies.upsert(drafts).await
    }

    /// Fetches and upserts this week's trending movies.
    pub async fn seed_trending(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let drafts = self.catalog.fetch_trending(limit).await?;
        self.movies.upsert(drafts).await
    }

    /// Builds the onboarding rating set: a wide seeding round, padded from
    /// already-stored movies when the catalog yields too few, shuffled and
    /// capped at `total`. One entry per internal movie id.
    pub async fn onboarding_movies(&self, total: usize) -> AppResult<Vec<Movie>> {
        let seeded = self
            .seed_for_genres(&SeedPlan {
                exclude_genres: Vec::new(),
                genres_to_pick: 6,
                movies_per_genre: 6,
            })
            .await?;

        let mut seen: HashSet<i64> = HashSet::new();
        let mut pool: Vec<Movie> = Vec::new();
        for movie in seeded {
            if seen.insert(movie.id) {
                pool.push(movie);
            }
        }

        if pool.len() < total {
            let existing = self.movies.random_sample(total as i64).await?;
            for movie in existing {
                if seen.insert(movie.id) {
                    pool.push(movie);
                }
            }
        }

        let order = self.random.permutation(pool.len());
        Ok(order
            .into_iter()
            .take(total)
            .map(|index| pool[index].clone())
            .collect())
    }

    fn pick_genres(&self, taxonomy: Vec<Genre>, plan: &SeedPlan) -> Vec<Genre> {
        let excluded: HashSet<&str> = plan
            .exclude_genres
            .iter()
            .map(String::as_str)
            .collect();
        let pool: Vec<Genre> = taxonomy
            .into_iter()
            .filter(|genre| !excluded.contains(genre.name.as_str()))
            .collect();

        self.random
            .permutation(pool.len())
            .into_iter()
            .take(plan.genres_to_pick)
            .map(|index| pool[index].clone())
            .collect()
    }
}
