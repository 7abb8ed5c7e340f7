use std::sync::Arc;

use crate::{
    db::{MovieStore, RatingStore, RecommendationQuery},
    error::{AppError, AppResult},
    models::Movie,
    services::seeder::{MovieSeeder, SeedPlan},
};

/// How many genres count as a user's favorites.
pub const FAVORITE_GENRE_LIMIT: i64 = 3;

/// Row cap shared by every tier's query.
pub const RECOMMENDATION_LIMIT: i64 = 20;

/// Trending volume used by the final fallback tier.
const TRENDING_SEED_LIMIT: usize = 20;

/// Result of one recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub favorite_genres: Vec<String>,
    pub recommendations: Vec<Movie>,
}

/// Generates genre-diversified recommendations
///
/// Derives the caller's favorite genres from their rating history, seeds
/// fresh out-of-genre catalog content, and queries the store through a
/// three-tier fallback policy that loosens its criteria until something
/// qualifies. Provider failures during seeding abort the request; only an
/// empty query result advances to the next tier. Tiers are never skipped.
pub struct RecommendationEngine {
    seeder: Arc<MovieSeeder>,
    movies: Arc<dyn MovieStore>,
    ratings: Arc<dyn RatingStore>,
}

impl RecommendationEngine {
    pub fn new(
        seeder: Arc<MovieSeeder>,
        movies: Arc<dyn MovieStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            seeder,
            movies,
            ratings,
        }
    }

    pub async fn recommend(&self, user_id: i64) -> AppResult<Recommendations> {
        let standings = self
            .ratings
            .favorite_genres(user_id, FAVORITE_GENRE_LIMIT)
            .await?;
        if standings.is_empty() {
            return Err(AppError::InsufficientData);
        }
        let favorite_genres: Vec<String> =
            standings.into_iter().map(|standing| standing.genre).collect();

        tracing::info!(user_id, favorites = ?favorite_genres, "Generating recommendations");

        // Tier 1: fresh content outside the favorites, high critic bar.
        self.seeder
            .seed_for_genres(&SeedPlan {
                exclude_genres: favorite_genres.clone(),
                genres_to_pick: 3,
                movies_per_genre: 8,
            })
            .await?;
        let picks = self
            .movies
            .recommendations_for(
                user_id,
                RecommendationQuery {
                    exclude_genres: favorite_genres.clone(),
                    min_critic_rating: Some(8.0),
                    limit: RECOMMENDATION_LIMIT,
                },
            )
            .await?;
        if !picks.is_empty() {
            return Ok(Recommendations {
                favorite_genres,
                recommendations: picks,
            });
        }

        // Tier 2: any genre, lower bar.
        tracing::debug!(user_id, "Tier 1 empty, widening to all genres");
        self.seeder
            .seed_for_genres(&SeedPlan {
                exclude_genres: Vec::new(),
                genres_to_pick: 5,
                movies_per_genre: 6,
            })
            .await?;
        let picks = self
            .movies
            .recommendations_for(
                user_id,
                RecommendationQuery {
                    exclude_genres: Vec::new(),
                    min_critic_rating: Some(7.0),
                    limit: RECOMMENDATION_LIMIT,
                },
            )
            .await?;
        if !picks.is_empty() {
            return Ok(Recommendations {
                favorite_genres,
                recommendations: picks,
            });
        }

        // Tier 3: trending, no rating floor. An empty result here is the
        // legitimate "nothing left to recommend" outcome, not an error.
        tracing::debug!(user_id, "Tier 2 empty, falling back to trending");
        self.seeder.seed_trending(TRENDING_SEED_LIMIT).await?;
        let picks = self
            .movies
            .recommendations_for(
                user_id,
                RecommendationQuery {
                    exclude_genres: Vec::new(),
                    min_critic_rating: None,
                    limit: RECOMMENDATION_LIMIT,
                },
            )
            .await?;

        Ok(Recommendations {
            favorite_genres,
            recommendations: picks,
        })
    }
}
