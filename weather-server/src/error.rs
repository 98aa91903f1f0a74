//! Rendering of [`ClassifiedError`] as HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use weather_core::{ClassifiedError, ErrorBody, ErrorKind};

/// Handler error: a classified error rendered as `{code, message}` JSON.
#[derive(Debug)]
pub struct ApiError(pub ClassifiedError);

impl From<ClassifiedError> for ApiError {
    fn from(err: ClassifiedError) -> Self {
        Self(err)
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self(kind.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_loggable() {
            tracing::error!(status = err.status(), error = %err, "request failed");
        }

        let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::from(&err))).into_response()
    }
}
