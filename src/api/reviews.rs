//! Review API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::common::{parse_id, JsonBody, SuccessResponse};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateReviewInput, Review, UpdateReviewInput};

const ENTITY: &str = "review";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/{id}", get(get_review).put(update_review).delete(delete_review))
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.review_service.list().await?))
}

async fn create_review(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateReviewInput>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.review_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.review_service.get(id).await?))
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateReviewInput>,
) -> Result<Json<Review>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.review_service.update(id, input).await?))
}

async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    state.review_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}
