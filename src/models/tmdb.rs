//! Raw TMDB API types and their mapping into internal records.

use serde::Deserialize;

use super::{Genre, MovieDraft};

const UNTITLED_FALLBACK: &str = "Untitled";
const SYNOPSIS_FALLBACK: &str = "Synopsis unavailable.";

/// Genre entry from `/genre/movie/list`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

impl From<TmdbGenre> for Genre {
    fn from(genre: TmdbGenre) -> Self {
        Genre {
            id: genre.id,
            name: genre.name,
        }
    }
}

/// Response envelope of `/genre/movie/list`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

/// One raw movie item from `/discover/movie` or `/trending/movie/week`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// Paged response envelope for discover/trending endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

impl TmdbMovie {
    /// Maps a raw item to a draft labelled with `genre_name`.
    ///
    /// Movie and TV payloads differ (`title`/`release_date` vs
    /// `name`/`first_air_date`); both spellings are accepted.
    pub fn into_draft(self, genre_name: &str, image_base_url: &str) -> MovieDraft {
        let release_year = parse_release_year(
            self.release_date
                .as_deref()
                .or(self.first_air_date.as_deref()),
        );
        // A blank title falls through to the TV-style name field.
        let title_source = self
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .or(self.name.as_deref());
        let title = normalise_text(title_source, UNTITLED_FALLBACK);
        let synopsis = normalise_text(self.overview.as_deref(), SYNOPSIS_FALLBACK);

        MovieDraft {
            tmdb_id: self.id,
            title,
            genre: genre_name.to_string(),
            synopsis,
            release_year,
            critic_rating: clamp_critic_rating(self.vote_average.unwrap_or(0.0)),
            poster_url: build_poster_url(image_base_url, self.poster_path.as_deref()),
        }
    }
}

/// Clamps a raw vote average to [0, 10] and rounds to one decimal.
pub fn clamp_critic_rating(vote_average: f64) -> f64 {
    (vote_average.clamp(0.0, 10.0) * 10.0).round() / 10.0
}

fn normalise_text(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => fallback.to_string(),
    }
}

/// Parses the leading 4 digits of a date string ("2010-07-16" -> 2010).
fn parse_release_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

fn build_poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", image_base_url, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn raw_movie() -> TmdbMovie {
        TmdbMovie {
            id: 27205,
            title: Some("Inception".to_string()),
            overview: Some("A thief who steals corporate secrets.".to_string()),
            release_date: Some("2010-07-16".to_string()),
            vote_average: Some(8.368),
            vote_count: Some(34000),
            poster_path: Some("/inception.jpg".to_string()),
            ..TmdbMovie::default()
        }
    }

    #[test]
    fn test_into_draft_maps_all_fields() {
        let draft = raw_movie().into_draft("Science Fiction", IMAGE_BASE);

        assert_eq!(draft.tmdb_id, 27205);
        assert_eq!(draft.title, "Inception");
        assert_eq!(draft.genre, "Science Fiction");
        assert_eq!(draft.synopsis, "A thief who steals corporate secrets.");
        assert_eq!(draft.release_year, Some(2010));
        assert_eq!(draft.critic_rating, 8.4);
        assert_eq!(
            draft.poster_url,
            Some("https://image.tmdb.org/t/p/w500/inception.jpg".to_string())
        );
    }

    #[test]
    fn test_into_draft_title_falls_back_to_name_then_untitled() {
        let mut raw = raw_movie();
        raw.title = None;
        raw.name = Some("Dark".to_string());
        assert_eq!(raw.clone().into_draft("Drama", IMAGE_BASE).title, "Dark");

        raw.title = Some("".to_string());
        assert_eq!(raw.clone().into_draft("Drama", IMAGE_BASE).title, "Dark");

        raw.title = None;
        raw.name = None;
        assert_eq!(raw.into_draft("Drama", IMAGE_BASE).title, "Untitled");
    }

    #[test]
    fn test_into_draft_blank_synopsis_falls_back() {
        let mut raw = raw_movie();
        raw.overview = Some("   ".to_string());
        assert_eq!(
            raw.into_draft("Drama", IMAGE_BASE).synopsis,
            "Synopsis unavailable."
        );
    }

    #[test]
    fn test_into_draft_missing_poster_is_none() {
        let mut raw = raw_movie();
        raw.poster_path = None;
        assert_eq!(raw.into_draft("Drama", IMAGE_BASE).poster_url, None);
    }

    #[test]
    fn test_release_year_prefers_release_date_over_first_air_date() {
        let mut raw = raw_movie();
        raw.first_air_date = Some("1999-01-01".to_string());
        assert_eq!(raw.into_draft("Drama", IMAGE_BASE).release_year, Some(2010));
    }

    #[test]
    fn test_release_year_unparseable_is_none() {
        let mut raw = raw_movie();
        raw.release_date = Some("soon".to_string());
        assert_eq!(raw.clone().into_draft("Drama", IMAGE_BASE).release_year, None);

        raw.release_date = None;
        assert_eq!(raw.into_draft("Drama", IMAGE_BASE).release_year, None);
    }

    #[test]
    fn test_clamp_critic_rating_bounds() {
        assert_eq!(clamp_critic_rating(-3.2), 0.0);
        assert_eq!(clamp_critic_rating(0.0), 0.0);
        assert_eq!(clamp_critic_rating(11.7), 10.0);
        assert_eq!(clamp_critic_rating(10.0), 10.0);
    }

    #[test]
    fn test_clamp_critic_rating_rounds_to_one_decimal() {
        assert_eq!(clamp_critic_rating(7.654), 7.7);
        assert_eq!(clamp_critic_rating(7.649), 7.6);
        assert_eq!(clamp_critic_rating(8.05), 8.1);
    }

    #[test]
    fn test_missing_vote_average_maps_to_zero() {
        let mut raw = raw_movie();
        raw.vote_average = None;
        assert_eq!(raw.into_draft("Drama", IMAGE_BASE).critic_rating, 0.0);
    }

    #[test]
    fn test_genre_list_deserialization() {
        let json = r#"{"genres":[{"id":28,"name":"Action"},{"id":18,"name":"Drama"}]}"#;
        let list: TmdbGenreList = serde_json::from_str(json).unwrap();
        assert_eq!(list.genres.len(), 2);

        let genre: Genre = list.genres[0].clone().into();
        assert_eq!(genre.id, 28);
        assert_eq!(genre.name, "Action");
    }
}
