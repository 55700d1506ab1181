use crate::config::ConfigError;
use crate::placement::{ModelInvalid, PipelineError};
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Model(ModelInvalid),
    Prediction(PipelineError),
    /// Request body the JSON extractor refused; `detail` is for logs only.
    MalformedBody { status: StatusCode, detail: String },
}

/// Requester-facing text for a body that is not a JSON object.
pub const MALFORMED_BODY_MESSAGE: &str = "Request body must be a JSON object of field values";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Prediction(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MalformedBody { status, .. } => *status,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Model(_)
            | AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Model(err) => write!(f, "model invalid: {}", err),
            // System detail was logged by the pipeline and stays there.
            AppError::Prediction(err) => f.write_str(&err.user_message()),
            AppError::MalformedBody { .. } => f.write_str(MALFORMED_BODY_MESSAGE),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Model(err) => Some(err),
            AppError::Prediction(err) => Some(err),
            AppError::MalformedBody { .. } => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ModelInvalid> for AppError {
    fn from(value: ModelInvalid) -> Self {
        Self::Model(value)
    }
}

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self::Prediction(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::MalformedBody {
            status: value.status(),
            detail: value.body_text(),
        }
    }
}
