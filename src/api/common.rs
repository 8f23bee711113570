//! Common API utilities and shared types

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::api::middleware::ApiError;

/// JSON body whose rejection is a 400 "Invalid request body"
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::validation_error("Invalid request body"))
            }
        }
    }
}

/// Parse a path or query id, rejecting anything but an integer
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation_error(format!("Invalid {} ID", entity)))
}

/// `?id=&limit=` on list endpoints
///
/// Both stay strings so a bad id can be reported and a bad limit ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub id: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn id(&self, entity: &str) -> Result<Option<i64>, ApiError> {
        self.id.as_deref().map(|raw| parse_id(raw, entity)).transpose()
    }

    /// Positive integer limit, anything else means no limit
    pub fn limit(&self) -> Option<i64> {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
    }
}

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}
