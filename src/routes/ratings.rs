use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    /// Optional so an absent field yields a 400 validation error instead of
    /// a 422 deserialization rejection. Same for the float rating: a
    /// fractional value must reach the integrality check.
    #[serde(default)]
    pub movie_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Handler for rating submission
pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<SubmitRatingRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let (movie_id, rating) = match (request.movie_id, request.rating) {
        (Some(movie_id), Some(rating)) => (movie_id, rating),
        _ => {
            return Err(AppError::Validation(
                "movieId and rating are required".to_string(),
            ))
        }
    };

    let value = integral_rating(rating)?;
    state.ratings.submit(user.id, movie_id, value).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Rating saved".to_string(),
        }),
    ))
}

/// Rejects non-integral ratings; range checking happens in the store.
fn integral_rating(rating: f64) -> AppResult<i32> {
    if !rating.is_finite() || rating.fract() != 0.0 {
        return Err(AppError::Validation(
            "Rating must be a number between 1 and 5".to_string(),
        ));
    }
    Ok(rating as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_rating_accepts_whole_numbers() {
        assert_eq!(integral_rating(1.0).unwrap(), 1);
        assert_eq!(integral_rating(5.0).unwrap(), 5);
    }

    #[test]
    fn test_integral_rating_rejects_fractions() {
        assert!(integral_rating(3.5).is_err());
        assert!(integral_rating(f64::NAN).is_err());
    }
}
