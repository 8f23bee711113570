//! Slider API endpoints
//!
//! - GET /api/sliders[?id=] - List sliders, or one slider
//! - POST /api/sliders - Create; 207 when the image could not be attached
//! - DELETE /api/sliders?id= - Delete by query
//! - GET /api/sliders/course-match?title= - Suggest the course a title refers to
//! - GET/PUT/DELETE /api/sliders/{id}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::{parse_id, JsonBody, ListQuery, SuccessResponse};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateSliderInput, Slider, UpdateSliderInput};
use crate::services::{CourseMatch, CourseRef, SliderCreateOutcome};

const ENTITY: &str = "slider";

/// 207 body for a slider saved without its image
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSuccessResponse {
    pub partial_success: bool,
    pub error: String,
    pub data: Slider,
}

#[derive(Debug, Deserialize)]
pub struct CourseMatchQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct MatchedCourse {
    pub id: i64,
    pub title: String,
    pub link: String,
}

impl From<&CourseRef> for MatchedCourse {
    fn from(course: &CourseRef) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            link: course.link(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseMatchResponse {
    #[serde(rename = "match")]
    pub kind: &'static str,
    pub course: Option<MatchedCourse>,
    pub candidates: Vec<MatchedCourse>,
}

impl From<CourseMatch> for CourseMatchResponse {
    fn from(found: CourseMatch) -> Self {
        let candidates = match &found {
            CourseMatch::Ambiguous(hits) => hits.iter().map(MatchedCourse::from).collect(),
            _ => Vec::new(),
        };
        Self {
            kind: found.kind(),
            course: found.course().map(MatchedCourse::from),
            candidates,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_sliders).post(create_slider).delete(delete_slider_by_query),
        )
        .route("/course-match", get(course_match))
        .route("/{id}", get(get_slider).put(update_slider).delete(delete_slider))
}

async fn list_sliders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = query.id(ENTITY)? {
        let slider = state.slider_service.get(id).await?;
        return Ok(Json(slider).into_response());
    }
    let sliders = state.slider_service.list().await?;
    Ok(Json(sliders).into_response())
}

async fn create_slider(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateSliderInput>,
) -> Result<Response, ApiError> {
    let response = match state.slider_service.create(input).await? {
        SliderCreateOutcome::Created(slider) => (StatusCode::CREATED, Json(slider)).into_response(),
        SliderCreateOutcome::Partial { slider, error } => (
            StatusCode::MULTI_STATUS,
            Json(PartialSuccessResponse {
                partial_success: true,
                error,
                data: slider,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

async fn get_slider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Slider>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.slider_service.get(id).await?))
}

async fn update_slider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateSliderInput>,
) -> Result<Json<Slider>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.slider_service.update(id, input).await?))
}

async fn delete_slider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    state.slider_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}

async fn delete_slider_by_query(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = query
        .id(ENTITY)?
        .ok_or_else(|| ApiError::validation_error("Slider ID is required"))?;
    state.slider_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}

async fn course_match(
    State(state): State<AppState>,
    Query(query): Query<CourseMatchQuery>,
) -> Result<Json<CourseMatchResponse>, ApiError> {
    let found = state.slider_service.course_match(&query.title).await?;
    Ok(Json(found.into()))
}
