use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    db::{MovieStore, PgMovieStore, PgRatingStore, RatingStore, UserStore},
    error::AppResult,
    services::{
        CatalogProvider, CredentialService, GenreCache, MovieSeeder, Randomness,
        RecommendationEngine, SystemClock, ThreadRandomness, TmdbCatalog,
    },
};

/// Shared application state
///
/// Cheap to clone: every member is an `Arc` or a small handle. Construction
/// fails fast on configuration problems (missing catalog credentials, empty
/// JWT secret) instead of surfacing them per request.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
    pub users: Arc<UserStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub seeder: Arc<MovieSeeder>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(config: &Config, pool: PgPool) -> AppResult<Self> {
        let credentials = CredentialService::new(config)?;

        let genre_cache = Arc::new(GenreCache::new(Arc::new(SystemClock)));
        let random: Arc<dyn Randomness> = Arc::new(ThreadRandomness);
        let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbCatalog::new(
            config,
            Arc::clone(&genre_cache),
            Arc::clone(&random),
        )?);

        let users = Arc::new(UserStore::new(pool.clone()));
        let movies: Arc<dyn MovieStore> = Arc::new(PgMovieStore::new(pool.clone()));
        let ratings: Arc<dyn RatingStore> = Arc::new(PgRatingStore::new(pool));

        let seeder = Arc::new(MovieSeeder::new(
            catalog,
            genre_cache,
            Arc::clone(&movies),
            random,
        ));
        let engine = Arc::new(RecommendationEngine::new(
            Arc::clone(&seeder),
            movies,
            Arc::clone(&ratings),
        ));

        Ok(Self {
            credentials,
            users,
            ratings,
            seeder,
            engine,
        })
    }
}
