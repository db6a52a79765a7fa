use axum::{http::StatusCode, response::IntoResponse, Json};
use crate::errors::AlertDeskError;
use super::models::ErrorResponse;

impl AlertDeskError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AlertDeskError::Config(_) | AlertDeskError::Validation(_) => StatusCode::BAD_REQUEST,
            AlertDeskError::InvalidTransition(_) => StatusCode::CONFLICT,
            AlertDeskError::NotFound(_) => StatusCode::NOT_FOUND,
            AlertDeskError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AlertDeskError::Network(_) | AlertDeskError::Gateway(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AlertDeskError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let message = match &self {
            AlertDeskError::Validation(m)
            | AlertDeskError::InvalidTransition(m)
            | AlertDeskError::NotFound(m) => m.clone(),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AlertDeskError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AlertDeskError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AlertDeskError::InvalidTransition("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AlertDeskError::Database("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
