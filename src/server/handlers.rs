use super::types::{HealthResponse, PredictError, PredictResponse, RootResponse};
use crate::{
    error::report,
    model::{Classifier, ModelHandle, Prediction, decode_image},
    recommend::{display_label, recommend},
};
use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Json,
};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelHandle>,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Plant Disease Detection API ({})", state.model.id()),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.model.is_ready(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let span = info_span!("predict", request_id = %Uuid::new_v4());

    async move {
        // Readiness is checked before the body is touched.
        let Some(classifier) = state.model.classifier() else {
            warn!("Rejecting prediction: model not loaded");
            return Err(PredictError::NotReady);
        };

        let mut multipart = multipart.map_err(|rejection| {
            warn!("Rejected upload: {}", rejection.body_text());
            PredictError::from(rejection)
        })?;

        let upload = read_upload(&mut multipart).await.inspect_err(|e| {
            warn!("Rejected upload: {}", e);
        })?;

        info!("Processing image: {}", upload.filename);

        match classify_upload(classifier, upload.bytes).await {
            Ok(top) => {
                let confidence = if top.score.is_finite() {
                    top.score.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                info!("Prediction: {} ({:.2})", top.label, confidence);

                Ok(Json(PredictResponse::Success {
                    class: display_label(&top.label),
                    confidence,
                    recommendation: recommend(&top.label).to_string(),
                }))
            }
            Err(e) => {
                error!("Prediction error: {}", report(&e));
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Takes the field named `file`, or failing that the first field that carries a filename.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, PredictError> {
    let mut fallback = None;

    while let Some(field) = multipart.next_field().await? {
        let is_file_field = field.name() == Some("file");
        if !is_file_field && (fallback.is_some() || field.file_name().is_none()) {
            continue;
        }

        let filename = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field.bytes().await?;
        let upload = Upload { filename, bytes };

        if is_file_field {
            return Ok(upload);
        }
        fallback = Some(upload);
    }

    fallback.ok_or(PredictError::MissingFile)
}

/// Decodes and classifies on the blocking pool, returning the top candidate.
async fn classify_upload(
    classifier: Arc<dyn Classifier>,
    bytes: Bytes,
) -> Result<Prediction, PredictError> {
    tokio::task::spawn_blocking(move || -> Result<Prediction, PredictError> {
        let image = decode_image(&bytes)?;

        let predictions = classifier.classify(&image)?;

        predictions
            .into_iter()
            .next()
            .ok_or_else(|| PredictError::Inference("Model returned no predictions".to_string()))
    })
    .await
    .map_err(|e| PredictError::Inference(format!("Inference task failed: {}", e)))?
}
