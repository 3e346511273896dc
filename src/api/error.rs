use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::WanderlustError;

/// Error returned by handlers, rendered as `{ "error": message }`
#[derive(Debug)]
pub struct ApiError(pub WanderlustError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WanderlustError::Validation { .. } => StatusCode::BAD_REQUEST,
            WanderlustError::NotFound { .. } => StatusCode::NOT_FOUND,
            WanderlustError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
            WanderlustError::Generation { .. } => StatusCode::BAD_GATEWAY,
            WanderlustError::Storage { .. } | WanderlustError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<WanderlustError> for ApiError {
    fn from(err: WanderlustError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, "Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WanderlustError::validation("x"), StatusCode::BAD_REQUEST)]
    #[case(WanderlustError::not_found("x"), StatusCode::NOT_FOUND)]
    #[case(WanderlustError::config("x"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(WanderlustError::generation("x"), StatusCode::BAD_GATEWAY)]
    #[case(WanderlustError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: WanderlustError, #[case] expected: StatusCode) {
        assert_eq!(ApiError(err).into_response().status(), expected);
    }
}
