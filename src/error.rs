use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::validate::FieldError;

/// Failures of the `/api/tryon` handler.
#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    #[error("Invalid request body: Failed to parse FormData.")]
    MalformedBody(String),
    #[error("Both userImage and clothingImage files are required")]
    MissingImages,
    #[error("Failed during API call: {0}")]
    Provider(String),
    #[error("Content generation failed due to safety settings: {0}")]
    Blocked(String),
    #[error("Received an unexpected or empty response from the API.")]
    EmptyResponse,
}

/// JSON body of every non-200 gateway response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TryOnError {
    pub fn status(&self) -> StatusCode {
        match self {
            TryOnError::MalformedBody(_) | TryOnError::MissingImages => StatusCode::BAD_REQUEST,
            TryOnError::Provider(_) | TryOnError::Blocked(_) | TryOnError::EmptyResponse => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            TryOnError::MalformedBody(details) => ErrorBody {
                error: self.to_string(),
                details: Some(details.clone()),
            },
            TryOnError::MissingImages => ErrorBody {
                error: self.to_string(),
                details: None,
            },
            _ => ErrorBody {
                error: "Failed to process virtual try-on request".to_string(),
                details: Some(self.to_string()),
            },
        }
    }
}

impl IntoResponse for TryOnError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!("Error processing virtual try-on request: {}", self);
        } else {
            tracing::warn!("Rejected try-on request: {}", self);
        }
        (self.status(), Json(self.body())).into_response()
    }
}

/// Failures surfaced by [`crate::TryOnClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{message}")]
    Api { message: String, status: u16 },
    #[error("API did not return a generated image URL.")]
    MissingImage,
    #[error("{}", join_field_errors(.0))]
    Invalid(Vec<FieldError>),
    #[error("An unexpected error occurred while processing the image: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
