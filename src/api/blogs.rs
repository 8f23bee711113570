//! Blog API endpoints
//!
//! - GET /api/blogs[?id=] - List posts, or one post
//! - POST /api/blogs - Create a post
//! - GET/PUT/DELETE /api/blogs/{id}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::common::{parse_id, JsonBody, ListQuery, SuccessResponse};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{Blog, CreateBlogInput, UpdateBlogInput};

const ENTITY: &str = "blog";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/{id}", get(get_blog).put(update_blog).delete(delete_blog))
}

async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = query.id(ENTITY)? {
        let blog = state.blog_service.get(id).await?;
        return Ok(Json(blog).into_response());
    }
    let blogs = state.blog_service.list().await?;
    Ok(Json(blogs).into_response())
}

async fn create_blog(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateBlogInput>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let blog = state.blog_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Blog>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.blog_service.get(id).await?))
}

async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateBlogInput>,
) -> Result<Json<Blog>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.blog_service.update(id, input).await?))
}

async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    state.blog_service.delete(id).await?;
    Ok(SuccessResponse::ok())
}
