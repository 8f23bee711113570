//! Course API endpoints
//!
//! - GET /api/courses[?id=&limit=] - List courses, or one course
//! - POST /api/courses - Create a course
//! - GET/PUT/DELETE /api/courses/{id}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::common::{parse_id, JsonBody, ListQuery, SuccessResponse};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{Course, CreateCourseInput, UpdateCourseInput};

const ENTITY: &str = "course";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/{id}", get(get_course).put(update_course).delete(delete_course))
}

async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = query.id(ENTITY)? {
        let course = state.course_service.get(id).await?;
        return Ok(Json(course).into_response());
    }
    let courses = state.course_service.list(query.limit()).await?;
    Ok(Json(courses).into_response())
}

async fn create_course(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateCourseInput>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let course = state.course_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.course_service.get(id).await?))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateCourseInput>,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.course_service.update(id, input).await?))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    state.course_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}
