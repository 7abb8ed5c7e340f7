//! External movie catalog abstraction
//!
//! The catalog is a read-only HTTP data source. A trait seam keeps the
//! recommendation pipeline testable without network access and leaves room
//! for alternative metadata providers.

use crate::{
    error::AppResult,
    models::{Genre, MovieDraft},
};

pub mod tmdb;

pub use tmdb::{Credentials, TmdbCatalog};

/// Vote-count floor applied to genre discovery queries.
pub const DEFAULT_MIN_VOTE_COUNT: i64 = 200;

/// Read-only client for the external movie catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// The genre taxonomy in the provider's order.
    async fn fetch_genres(&self) -> AppResult<Vec<Genre>>;

    /// Well-voted movies for one genre, mapped to drafts.
    ///
    /// Results are filtered to a non-zero average vote and at least
    /// `min_vote_count` votes, then truncated to `limit`.
    async fn fetch_movies_by_genre(
        &self,
        genre: &Genre,
        limit: usize,
        min_vote_count: i64,
    ) -> AppResult<Vec<MovieDraft>>;

    /// This week's trending movies, truncated to `limit`.
    async fn fetch_trending(&self, limit: usize) -> AppResult<Vec<MovieDraft>>;
}
