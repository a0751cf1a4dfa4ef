/// Error taxonomy shared by the service and the HTTP surface
///
/// Validation and not-found errors carry a client-facing message. Everything
/// else is an external dependency failure that is logged and reported as a
/// generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::project::types::ProjectId;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// A required field is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// The request body exceeds the upload limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The id does not resolve to a row
    #[error("Project not found.")]
    NotFound { id: ProjectId },

    #[error("media upload failed: {0}")]
    MediaUpload(String),

    #[error("media delete failed: {0}")]
    MediaDelete(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

impl ProjectError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProjectError::Validation(_) => StatusCode::BAD_REQUEST,
            ProjectError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProjectError::NotFound { .. } => StatusCode::NOT_FOUND,
            ProjectError::MediaUpload(_)
            | ProjectError::MediaDelete(_)
            | ProjectError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A [`ProjectError`] bound to the public failure message of the route that
/// produced it
///
/// 4xx errors expose their own message; 5xx errors expose only `public_message`.
#[derive(Debug)]
pub struct ApiError {
    pub error: ProjectError,
    pub public_message: &'static str,
}

impl ApiError {
    pub fn new(error: ProjectError, public_message: &'static str) -> Self {
        Self { error, public_message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self.error, "❌ {}", self.public_message);
            self.public_message.to_string()
        } else {
            self.error.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Attach a route's public failure message to a service result
pub trait OrRespond<T> {
    fn or_respond(self, public_message: &'static str) -> Result<T, ApiError>;
}

impl<T> OrRespond<T> for ProjectResult<T> {
    fn or_respond(self, public_message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(e, public_message))
    }
}
