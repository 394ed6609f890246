use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::form::StateError;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::services::{FormEventError, SessionId};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures of the form API, each mapped to one status code
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(SessionId),
    BadEvent(String),
    InvalidTransition(StateError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadEvent(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidTransition(_) => StatusCode::CONFLICT,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::SessionNotFound(id) => write!(f, "No form session {id}"),
            ApiError::BadEvent(reason) => f.write_str(reason),
            ApiError::InvalidTransition(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<FormEventError> for ApiError {
    fn from(error: FormEventError) -> Self {
        match error {
            FormEventError::Rejected(state) => ApiError::InvalidTransition(state),
            other => ApiError::BadEvent(other.to_string()),
        }
    }
}

impl From<StateError> for ApiError {
    fn from(error: StateError) -> Self {
        ApiError::InvalidTransition(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Form API error ({status}): {self}");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
