use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::{Movie, MovieDraft},
};

/// Filter for one recommendation query tier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecommendationQuery {
    /// Genre names to leave out; empty means no exclusion.
    pub exclude_genres: Vec<String>,
    /// Strict lower bound on critic rating; None means no threshold.
    pub min_critic_rating: Option<f64>,
    pub limit: i64,
}

/// Persistence of catalog movies, deduplicated by their external id.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert-or-update the drafts keyed on `tmdb_id` and return the
    /// canonical stored rows for exactly the submitted ids.
    async fn upsert(&self, drafts: Vec<MovieDraft>) -> AppResult<Vec<Movie>>;

    /// Movies the user has not rated, matching the filter, best rated first.
    async fn recommendations_for(
        &self,
        user_id: i64,
        query: RecommendationQuery,
    ) -> AppResult<Vec<Movie>>;

    /// Random sample of stored movies, used to pad the onboarding set.
    async fn random_sample(&self, limit: i64) -> AppResult<Vec<Movie>>;
}

pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MOVIE_COLUMNS: &str =
    "id, tmdb_id, title, genre, synopsis, release_year, critic_rating, poster_url";

/// Collapses drafts sharing a `tmdb_id`; the last occurrence wins.
///
/// The upsert INSERT must not contain the same `tmdb_id` twice, or Postgres
/// rejects it with "ON CONFLICT DO UPDATE command cannot affect row a second
/// time". First-seen order is kept for the surviving drafts.
pub(crate) fn dedupe_last_wins(drafts: Vec<MovieDraft>) -> Vec<MovieDraft> {
    let mut order: Vec<i64> = Vec::new();
    let mut by_id: HashMap<i64, MovieDraft> = HashMap::new();

    for draft in drafts {
        if !by_id.contains_key(&draft.tmdb_id) {
            order.push(draft.tmdb_id);
        }
        by_id.insert(draft.tmdb_id, draft);
    }

    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}

#[async_trait::async_trait]
impl MovieStore for PgMovieStore {
    async fn upsert(&self, drafts: Vec<MovieDraft>) -> AppResult<Vec<Movie>> {
        let unique = dedupe_last_wins(drafts);
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO movies (tmdb_id, title, genre, synopsis, release_year, critic_rating, poster_url) ",
        );
        builder.push_values(unique.iter(), |mut row, draft| {
            row.push_bind(draft.tmdb_id)
                .push_bind(draft.title.clone())
                .push_bind(draft.genre.clone())
                .push_bind(draft.synopsis.clone())
                .push_bind(draft.release_year)
                .push_bind(draft.critic_rating)
                .push_bind(draft.poster_url.clone());
        });
        builder.push(
            " ON CONFLICT (tmdb_id) DO UPDATE SET \
             title = EXCLUDED.title, \
             genre = EXCLUDED.genre, \
             synopsis = EXCLUDED.synopsis, \
             release_year = EXCLUDED.release_year, \
             critic_rating = EXCLUDED.critic_rating, \
             poster_url = EXCLUDED.poster_url",
        );
        builder.build().execute(&self.pool).await?;

        let tmdb_ids: Vec<i64> = unique.iter().map(|draft| draft.tmdb_id).collect();
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE tmdb_id = ANY($1)"
        ))
        .bind(&tmdb_ids)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(submitted = tmdb_ids.len(), stored = rows.len(), "Upserted movies");

        Ok(rows)
    }

    async fn recommendations_for(
        &self,
        user_id: i64,
        query: RecommendationQuery,
    ) -> AppResult<Vec<Movie>> {
        // An empty exclusion array passes every row: `genre <> ALL('{}')`
        // is vacuously true.
        let sql = "SELECT m.id, m.tmdb_id, m.title, m.genre, m.synopsis, m.release_year, \
                    m.critic_rating, m.poster_url \
             FROM movies m \
             LEFT JOIN ratings r ON r.movie_id = m.id AND r.user_id = $1 \
             WHERE r.movie_id IS NULL \
               AND m.genre <> ALL($2) \
               AND ($3::float8 IS NULL OR m.critic_rating > $3) \
             ORDER BY m.critic_rating DESC, m.release_year DESC NULLS LAST \
             LIMIT $4";

        let rows = sqlx::query_as::<_, Movie>(sql)
            .bind(user_id)
            .bind(&query.exclude_genres)
            .bind(query.min_critic_rating)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn random_sample(&self, limit: i64) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY random() LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
