use crate::model::DecodeError;
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MODEL_NOT_LOADED: &str = "Model not loaded";

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Body of `/predict`. Callers tell success from failure by the presence of `error`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Success {
        class: String,
        confidence: f32,
        recommendation: String,
    },
    NotLoaded {
        error: &'static str,
        class: &'static str,
        confidence: u8,
    },
    Failure {
        error: String,
    },
}

impl PredictResponse {
    pub fn not_loaded() -> Self {
        Self::NotLoaded {
            error: MODEL_NOT_LOADED,
            class: "Error",
            confidence: 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Model not loaded")]
    NotReady,

    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid upload: {message}")]
    Upload { status: StatusCode, message: String },

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Classifier(#[from] crate::Error),

    #[error("{0}")]
    Inference(String),
}

impl PredictError {
    /// Oversized bodies keep their 413; every other malformed upload is a 422.
    pub fn upload(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status == StatusCode::PAYLOAD_TOO_LARGE {
            status
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };

        Self::Upload {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upload { status, .. } => *status,
            Self::NotReady | Self::Decode(_) | Self::Classifier(_) | Self::Inference(_) => {
                StatusCode::OK
            }
        }
    }

    pub fn to_response(&self) -> PredictResponse {
        match self {
            Self::NotReady => PredictResponse::not_loaded(),
            other => PredictResponse::Failure {
                error: other.to_string(),
            },
        }
    }
}

impl From<MultipartRejection> for PredictError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::upload(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for PredictError {
    fn from(err: MultipartError) -> Self {
        Self::upload(err.status(), err.body_text())
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_response())).into_response()
    }
}
