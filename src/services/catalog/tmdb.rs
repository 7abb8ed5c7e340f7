use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{header, Client as HttpClient};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbGenreList, TmdbPage},
        Genre, MovieDraft,
    },
    services::{catalog::CatalogProvider, genre_cache::GenreCache, random::Randomness},
};

/// Discovery queries pick a pseudo-random page in [1, PAGE_SPREAD] so
/// repeated seeding rounds surface different movies. Intentional variety,
/// not a bug.
const PAGE_SPREAD: u32 = 5;

/// Genre label applied to trending items whose ids match no taxonomy entry.
const TRENDING_FALLBACK_GENRE: &str = "Trending";

/// Resolved TMDB credential.
///
/// The v4 read access token travels as a bearer header; the v3 key rides as
/// an `api_key` query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    BearerToken(String),
    ApiKey(String),
}

impl Credentials {
    /// Prefers the read access token, falls back to the API key.
    /// Whitespace-only values count as absent.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let read_token = config
            .tmdb_read_access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty());
        let api_key = config
            .tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());

        if let Some(token) = read_token {
            return Ok(Credentials::BearerToken(token.to_string()));
        }
        if let Some(key) = api_key {
            return Ok(Credentials::ApiKey(key.to_string()));
        }

        Err(AppError::Configuration(
            "TMDB credentials are missing. Configure TMDB_READ_ACCESS_TOKEN or TMDB_API_KEY"
                .to_string(),
        ))
    }
}

/// TMDB-backed catalog client
pub struct TmdbCatalog {
    http_client: HttpClient,
    credentials: Credentials,
    api_url: String,
    image_base_url: String,
    genre_cache: Arc<GenreCache>,
    random: Arc<dyn Randomness>,
}

impl TmdbCatalog {
    pub fn new(
        config: &Config,
        genre_cache: Arc<GenreCache>,
        random: Arc<dyn Randomness>,
    ) -> AppResult<Self> {
        let credentials = Credentials::from_config(config)?;

        Ok(Self {
            http_client: HttpClient::new(),
            credentials,
            api_url: config.tmdb_api_url.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
            genre_cache,
            random,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let mut request = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(params);
        request = match &self.credentials {
            Credentials::BearerToken(token) => request.bearer_auth(token),
            Credentials::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "Catalog request failed"
            );
            return Err(AppError::CatalogFetch {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn fetch_genres(&self) -> AppResult<Vec<Genre>> {
        let list: TmdbGenreList = self
            .get_json("/genre/movie/list", &[("language", "en-US".to_string())])
            .await?;

        Ok(list.genres.into_iter().map(Genre::from).collect())
    }

    async fn fetch_movies_by_genre(
        &self,
        genre: &Genre,
        limit: usize,
        min_vote_count: i64,
    ) -> AppResult<Vec<MovieDraft>> {
        let page = self.random.page(PAGE_SPREAD);
        let response: TmdbPage = self
            .get_json(
                "/discover/movie",
                &[
                    ("with_genres", genre.id.to_string()),
                    ("sort_by", "vote_average.desc".to_string()),
                    ("include_adult", "false".to_string()),
                    ("include_video", "false".to_string()),
                    ("language", "en-US".to_string()),
                    ("page", page.to_string()),
                    ("vote_count.gte", min_vote_count.to_string()),
                ],
            )
            .await?;

        let drafts = shape_discover_results(
            response,
            &genre.name,
            limit,
            min_vote_count,
            &self.image_base_url,
        );

        tracing::debug!(
            genre = %genre.name,
            page,
            drafts = drafts.len(),
            "Fetched genre discovery page"
        );

        Ok(drafts)
    }

    async fn fetch_trending(&self, limit: usize) -> AppResult<Vec<MovieDraft>> {
        let genres = self.genre_cache.get(self).await?;
        let response: TmdbPage = self
            .get_json("/trending/movie/week", &[("language", "en-US".to_string())])
            .await?;

        let drafts = shape_trending_results(response, &genres, limit, &self.image_base_url);

        tracing::debug!(drafts = drafts.len(), "Fetched trending movies");

        Ok(drafts)
    }
}

/// Filters a discovery page to well-voted items and maps them to drafts.
fn shape_discover_results(
    page: TmdbPage,
    genre_name: &str,
    limit: usize,
    min_vote_count: i64,
    image_base_url: &str,
) -> Vec<MovieDraft> {
    page.results
        .into_iter()
        .filter(|movie| {
            movie.vote_average.unwrap_or(0.0) > 0.0
                && movie.vote_count.unwrap_or(0) >= min_vote_count
        })
        .take(limit)
        .map(|movie| movie.into_draft(genre_name, image_base_url))
        .collect()
}

/// Maps trending items to drafts, labelling each with its primary genre.
fn shape_trending_results(
    page: TmdbPage,
    genres: &[Genre],
    limit: usize,
    image_base_url: &str,
) -> Vec<MovieDraft> {
    let names_by_id: HashMap<i64, &str> = genres
        .iter()
        .map(|genre| (genre.id, genre.name.as_str()))
        .collect();

    page.results
        .into_iter()
        .take(limit)
        .map(|movie| {
            let genre_name = movie
                .genre_ids
                .first()
                .and_then(|id| names_by_id.get(id).copied())
                .unwrap_or(TRENDING_FALLBACK_GENRE);
            movie.into_draft(genre_name, image_base_url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tmdb::TmdbMovie;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn config_with(token: Option<&str>, key: Option<&str>) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            tmdb_read_access_token: token.map(str::to_string),
            tmdb_api_key: key.map(str::to_string),
            tmdb_api_url: "https://api.themoviedb.org/3".to_string(),
            tmdb_image_base_url: IMAGE_BASE.to_string(),
            jwt_secret: "secret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }

    fn voted_movie(id: i64, vote_average: f64, vote_count: i64) -> TmdbMovie {
        TmdbMovie {
            id,
            title: Some(format!("Movie {}", id)),
            vote_average: Some(vote_average),
            vote_count: Some(vote_count),
            ..TmdbMovie::default()
        }
    }

    #[test]
    fn test_credentials_prefer_bearer_token() {
        let config = config_with(Some("v4-token"), Some("v3-key"));
        assert_eq!(
            Credentials::from_config(&config).unwrap(),
            Credentials::BearerToken("v4-token".to_string())
        );
    }

    #[test]
    fn test_credentials_fall_back_to_api_key() {
        let config = config_with(None, Some("v3-key"));
        assert_eq!(
            Credentials::from_config(&config).unwrap(),
            Credentials::ApiKey("v3-key".to_string())
        );
    }

    #[test]
    fn test_credentials_blank_token_counts_as_absent() {
        let config = config_with(Some("   "), Some("v3-key"));
        assert_eq!(
            Credentials::from_config(&config).unwrap(),
            Credentials::ApiKey("v3-key".to_string())
        );
    }

    #[test]
    fn test_credentials_missing_is_configuration_error() {
        let config = config_with(None, None);
        let result = Credentials::from_config(&config);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_shape_discover_filters_low_vote_counts() {
        let page = TmdbPage {
            results: vec![
                voted_movie(1, 8.2, 1000),
                voted_movie(2, 9.0, 50),
                voted_movie(3, 7.4, 200),
            ],
        };

        let drafts = shape_discover_results(page, "Action", 10, 200, IMAGE_BASE);

        let ids: Vec<i64> = drafts.iter().map(|d| d.tmdb_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(drafts.iter().all(|d| d.genre == "Action"));
    }

    #[test]
    fn test_shape_discover_drops_zero_vote_average() {
        let page = TmdbPage {
            results: vec![voted_movie(1, 0.0, 5000), voted_movie(2, 6.1, 5000)],
        };

        let drafts = shape_discover_results(page, "Drama", 10, 200, IMAGE_BASE);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].tmdb_id, 2);
    }

    #[test]
    fn test_shape_discover_truncates_to_limit() {
        let page = TmdbPage {
            results: (1..=10).map(|id| voted_movie(id, 8.0, 500)).collect(),
        };

        let drafts = shape_discover_results(page, "Action", 4, 200, IMAGE_BASE);

        assert_eq!(drafts.len(), 4);
    }

    #[test]
    fn test_shape_trending_labels_primary_genre() {
        let genres = vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
        ];
        let mut known = voted_movie(1, 7.0, 100);
        known.genre_ids = vec![18, 28];
        let mut unknown = voted_movie(2, 6.0, 100);
        unknown.genre_ids = vec![999];
        let unlabelled = voted_movie(3, 5.0, 100);

        let page = TmdbPage {
            results: vec![known, unknown, unlabelled],
        };
        let drafts = shape_trending_results(page, &genres, 10, IMAGE_BASE);

        assert_eq!(drafts[0].genre, "Drama");
        assert_eq!(drafts[1].genre, "Trending");
        assert_eq!(drafts[2].genre, "Trending");
    }

    #[test]
    fn test_shape_trending_truncates_to_limit() {
        let page = TmdbPage {
            results: (1..=30).map(|id| voted_movie(id, 7.0, 100)).collect(),
        };

        let drafts = shape_trending_results(page, &[], 20, IMAGE_BASE);

        assert_eq!(drafts.len(), 20);
    }
}
