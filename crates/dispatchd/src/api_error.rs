//! HTTP rendering of workflow errors.
//!
//! Every failure, including bodies and query strings axum refuses to
//! decode, is rendered as `{"error": {"code", "message"}}`.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dispatch_shared::DispatchError;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dispatch(e) => match e {
                DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
                DispatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DispatchError::InvalidTransition { .. }
                | DispatchError::StationUnavailable { .. }
                | DispatchError::NoOperationalUnit { .. }
                | DispatchError::Conflict(_) => StatusCode::CONFLICT,
                DispatchError::Store(_) | DispatchError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Dispatch(e) => e.code(),
            ApiError::Worker(_) => "internal_error",
            ApiError::Body(_) | ApiError::Query(_) => "validation_failed",
        }
    }

    fn is_client_error(&self) -> bool {
        match self {
            ApiError::Dispatch(e) => e.is_client_error(),
            ApiError::Worker(_) => false,
            ApiError::Body(_) | ApiError::Query(_) => true,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_client_error() {
            debug!("  Request refused ({}): {}", status, self);
        } else {
            error!("  Request failed: {}", self);
        }
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `Json` whose rejection uses the API error body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Query` whose rejection uses the API error body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
