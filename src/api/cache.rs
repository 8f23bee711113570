//! Manual public-site cache invalidation
//!
//! POST /api/cache/clear with `{"type": "courses"|"blogs", "key": ...}`.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::common::JsonBody;
use crate::api::middleware::{ApiError, AppState};
use crate::services::CacheKind;

#[derive(Debug, Deserialize)]
pub struct ClearCacheRequest {
    #[serde(rename = "type")]
    pub kind: CacheKind,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub success: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/clear", post(clear_cache))
}

/// `success` mirrors whether the public site acknowledged the request
async fn clear_cache(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ClearCacheRequest>,
) -> Result<Json<ClearCacheResponse>, ApiError> {
    let key = request.key.as_deref().filter(|k| !k.is_empty());
    let success = state.site_cache.invalidate(request.kind, key).await;
    Ok(Json(ClearCacheResponse { success }))
}
