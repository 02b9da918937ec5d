use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use weather_core::{Axis, CredentialError, UpstreamError, ValidationError};

/// Failure of a weather lookup, as seen by the HTTP layer.
///
/// Clients only ever get the short message from `public_message`; the full
/// error is logged here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("input error: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Credential(_) | AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Credential(_) => "invalid API key",
            AppError::InvalidInput(e) => match e.axis() {
                Axis::Latitude => "Invalid latitude",
                Axis::Longitude => "Invalid longitude",
            },
            AppError::Upstream(_) => "upstream weather service error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidInput(_) => tracing::warn!(error = %self, "rejected weather request"),
            _ => tracing::error!(error = %self, "weather lookup failed"),
        }

        (self.status(), self.public_message()).into_response()
    }
}
