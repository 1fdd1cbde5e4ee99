use crate::api::db::QueryError;
use crate::api::resolution::ResolveError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use shared::prayer_times::ValidationError;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    QueryError(#[from] QueryError),
    #[error("mosque {0} not found")]
    MosqueNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => {
                warn!(error = %e, "rejected invalid input");
                ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())).into_response()
            }
            ApiError::InvalidBody(msg) => {
                warn!(error = msg, "rejected malformed request body");
                ErrorMessage::from((StatusCode::BAD_REQUEST, msg)).into_response()
            }
            ApiError::MosqueNotFound(id) | ApiError::Resolve(ResolveError::MosqueNotFound(id)) => {
                warn!(mosque_id = id, "mosque not found");
                ErrorMessage::from((StatusCode::NOT_FOUND, "Mosque not found")).into_response()
            }
            ApiError::Resolve(ResolveError::ProviderUnavailable(e)) => {
                warn!(error = ?e, "failed to fetch prayer times from provider");
                ErrorMessage::from((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch prayer times",
                ))
                .into_response()
            }
            ApiError::QueryError(QueryError::Sql(e))
            | ApiError::Resolve(ResolveError::Query(QueryError::Sql(e))) => {
                warn!(error = ?e, "sql error");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, "")).into_response()
            }
        }
    }
}

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

impl From<(StatusCode, String)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, String)) -> Self {
        Self {
            status_code,
            message,
        }
    }
}

impl From<(StatusCode, &str)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, &str)) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
