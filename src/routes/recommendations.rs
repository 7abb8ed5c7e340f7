use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{error::AppResult, middleware::CurrentUser, models::Movie, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub favorite_genres: Vec<String>,
    pub recommendations: Vec<Movie>,
}

/// Handler for personalized recommendations
pub async fn recommend(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<RecommendationsResponse>> {
    let outcome = state.engine.recommend(user.id).await?;

    Ok(Json(RecommendationsResponse {
        favorite_genres: outcome.favorite_genres,
        recommendations: outcome.recommendations,
    }))
}
