use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppResult, models::Movie, state::AppState};

/// Size of the onboarding rating set.
pub const ONBOARDING_TOTAL: usize = 20;

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub movies: Vec<Movie>,
}

/// Handler for the onboarding movie set
///
/// Seeds a broad slice of the catalog and returns a shuffled sample for the
/// user to rate. At most `ONBOARDING_TOTAL` movies, one entry per movie.
pub async fn onboarding(State(state): State<AppState>) -> AppResult<Json<OnboardingResponse>> {
    let movies = state.seeder.onboarding_movies(ONBOARDING_TOTAL).await?;
    Ok(Json(OnboardingResponse { movies }))
}
