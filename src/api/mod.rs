//! API layer - HTTP handlers and routing
//!
//! Every route lives under `/api`. Uploaded files are served from
//! `/uploads`.

pub mod blogs;
pub mod cache;
pub mod common;
pub mod courses;
pub mod health;
pub mod lecturers;
pub mod middleware;
pub mod offered_courses;
pub mod reviews;
pub mod sliders;
pub mod upload;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::cache::create_cache;
use crate::config::Config;
use crate::db::repositories::{
    SqlxBlogRepository, SqlxCourseRepository, SqlxLecturerRepository,
    SqlxOfferedCourseRepository, SqlxReviewRepository, SqlxSliderRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{
    BlogService, CourseService, LecturerService, OfferedCourseService, ReviewService,
    SiteCacheClient, SliderService,
};

pub use middleware::{ApiError, AppState, RequestStats};

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Wire repositories, cache and services into the shared state
pub fn build_state(pool: DynDatabasePool, config: &Config) -> Result<AppState> {
    let cache = create_cache(&config.cache);
    let site_cache = Arc::new(
        SiteCacheClient::new(&config.main_site).context("Failed to create main site client")?,
    );

    let course_repo = SqlxCourseRepository::boxed(pool.clone());

    Ok(AppState {
        blog_service: Arc::new(BlogService::new(
            SqlxBlogRepository::boxed(pool.clone()),
            cache.clone(),
            site_cache.clone(),
        )),
        course_service: Arc::new(CourseService::new(
            course_repo.clone(),
            cache.clone(),
            site_cache.clone(),
        )),
        offered_course_service: Arc::new(OfferedCourseService::new(
            SqlxOfferedCourseRepository::boxed(pool.clone()),
            cache.clone(),
        )),
        slider_service: Arc::new(SliderService::new(
            SqlxSliderRepository::boxed(pool.clone()),
            course_repo.clone(),
            cache.clone(),
        )),
        review_service: Arc::new(ReviewService::new(
            SqlxReviewRepository::boxed(pool.clone()),
            course_repo,
            cache.clone(),
            config.main_site.url.clone(),
        )),
        lecturer_service: Arc::new(LecturerService::new(
            SqlxLecturerRepository::boxed(pool.clone()),
            cache,
        )),
        site_cache,
        upload_config: Arc::new(config.upload.clone()),
        request_stats: Arc::new(RequestStats::new()),
        pool,
    })
}

/// Build the `/api` router
pub fn build_api_router(state: &AppState) -> Router<AppState> {
    let upload_limit = state.upload_config.max_file_size as usize + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health))
        .nest("/blogs", blogs::router())
        .nest("/courses", courses::router())
        .nest("/offered-courses", offered_courses::router())
        .nest("/sliders", sliders::router())
        .nest("/reviews", reviews::router())
        .nest("/lecturers", lecturers::router())
        .nest("/cache", cache::router())
        .nest(
            "/upload",
            upload::router().layer(DefaultBodyLimit::max(upload_limit)),
        )
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let mut router = Router::new().nest("/api", build_api_router(&state));

    // Files are only served locally when the public URL is a path on this host
    let uploads_prefix = state.upload_config.public_url.trim_end_matches('/');
    if uploads_prefix.len() > 1 && uploads_prefix.starts_with('/') {
        router = router.nest_service(uploads_prefix, ServeDir::new(&state.upload_config.path));
    }

    Ok(router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state))
}
