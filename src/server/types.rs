use crate::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnRequest {
    #[serde(default)]
    pub selfie_data_url: Option<String>,
    #[serde(default)]
    pub garment_data_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    pub ok: bool,
    /// Canonical reference to the generated image: a data URL or an
    /// absolute HTTP(S) URL.
    pub result: String,
    /// Canonical reference to the masked intermediate, or null when the
    /// Space did not return one.
    pub masked: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseSearchRequest {
    #[serde(default)]
    pub garment_data_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseSearchResponse {
    pub ok: bool,
    pub image_url: String,
    pub google_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Raw Space envelope, included when the failure was "no usable output
    /// image" so operators can see what the Space actually sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            details: None,
            raw: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(error)
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);

        let (status, body) = match self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            Error::MalformedInput(details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("Invalid data URL", details),
            ),
            Error::NoOutputImage { raw } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    raw: Some(raw),
                    ..ErrorResponse::new("Try-on service returned no image")
                },
            ),
            Error::Remote(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Backend error", details),
            ),
            Error::Storage(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Storage error", details),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Backend error", other.to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}
