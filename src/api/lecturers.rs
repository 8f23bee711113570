//! Lecturer API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::common::{parse_id, JsonBody, SuccessResponse};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateLecturerInput, Lecturer, UpdateLecturerInput};

const ENTITY: &str = "lecturer";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lecturers).post(create_lecturer))
        .route("/{id}", get(get_lecturer).put(update_lecturer).delete(delete_lecturer))
}

async fn list_lecturers(State(state): State<AppState>) -> Result<Json<Vec<Lecturer>>, ApiError> {
    Ok(Json(state.lecturer_service.list().await?))
}

async fn create_lecturer(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateLecturerInput>,
) -> Result<(StatusCode, Json<Lecturer>), ApiError> {
    let lecturer = state.lecturer_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(lecturer)))
}

async fn get_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lecturer>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.lecturer_service.get(id).await?))
}

async fn update_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateLecturerInput>,
) -> Result<Json<Lecturer>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.lecturer_service.update(id, input).await?))
}

async fn delete_lecturer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    state.lecturer_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}
