//! Offered course API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::common::{parse_id, JsonBody, ListQuery, SuccessResponse};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{OfferedCourse, OfferedCourseInput};

const ENTITY: &str = "offered course";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_offered_courses).post(create_offered_course))
        .route(
            "/{id}",
            get(get_offered_course)
                .put(update_offered_course)
                .delete(delete_offered_course),
        )
}

/// GET /api/offered-courses[?limit=]
async fn list_offered_courses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OfferedCourse>>, ApiError> {
    Ok(Json(state.offered_course_service.list(query.limit()).await?))
}

async fn create_offered_course(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<OfferedCourseInput>,
) -> Result<(StatusCode, Json<OfferedCourse>), ApiError> {
    let course = state.offered_course_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_offered_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OfferedCourse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.offered_course_service.get(id).await?))
}

async fn update_offered_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<OfferedCourseInput>,
) -> Result<Json<OfferedCourse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.offered_course_service.update(id, input).await?))
}

async fn delete_offered_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    state.offered_course_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}
