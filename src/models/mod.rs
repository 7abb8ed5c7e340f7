use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub mod tmdb;

/// Registered account. The password hash never leaves the database layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Canonical movie row. `id` is the internal key; `tmdb_id` is the stable
/// identity across re-fetches from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub tmdb_id: i64,
    pub title: String,
    pub genre: String,
    pub synopsis: String,
    pub release_year: Option<i32>,
    pub critic_rating: f64,
    pub poster_url: Option<String>,
}

/// Unsaved movie record freshly mapped from catalog data, prior to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDraft {
    pub tmdb_id: i64,
    pub title: String,
    pub genre: String,
    pub synopsis: String,
    pub release_year: Option<i32>,
    pub critic_rating: f64,
    pub poster_url: Option<String>,
}

/// One entry of the external catalog's genre taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Aggregate of one user's ratings within a single genre.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GenreStanding {
    pub genre: String,
    pub avg_rating: f64,
    pub total_ratings: i64,
}
