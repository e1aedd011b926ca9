use super::{
    classifier::Classifier, fetch::ensure_artifact, labels::load_labels, onnx::OnnxClassifier,
};
use crate::{Error, Result, config::ModelConfig, error::report};
use chrono::Utc;
use std::{backtrace::Backtrace, fmt, path::Path, sync::Arc};
use tracing::{error, info};

pub enum ModelState {
    Ready(Arc<dyn Classifier>),
    Failed(String),
}

/// The process-wide classifier, built once at startup and shared read-only afterwards.
pub struct ModelHandle {
    id: String,
    state: ModelState,
}

impl ModelHandle {
    pub fn ready(id: impl Into<String>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            id: id.into(),
            state: ModelState::Ready(classifier),
        }
    }

    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: ModelState::Failed(reason.into()),
        }
    }

    /// Loads the configured model. Never fails: a load error is logged, written to
    /// `startup_error_path`, and leaves the handle in the failed state for the
    /// lifetime of the process.
    pub async fn load(config: &ModelConfig) -> Self {
        info!("Loading model: {}...", config.id);

        match load_classifier(config).await {
            Ok(classifier) => {
                info!("Model loaded successfully: {}", config.id);
                Self::ready(config.id.clone(), classifier)
            }
            Err(e) => {
                error!("Failed to load model: {}", report(&e));
                if let Err(write_err) =
                    write_startup_error(&config.startup_error_path, &e).await
                {
                    error!(
                        "Failed to write {}: {}",
                        config.startup_error_path, write_err
                    );
                }
                Self::failed(config.id.clone(), report(&e))
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn classifier(&self) -> Option<Arc<dyn Classifier>> {
        match &self.state {
            ModelState::Ready(classifier) => Some(Arc::clone(classifier)),
            ModelState::Failed(_) => None,
        }
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            ModelState::Ready(_) => "ready".to_string(),
            ModelState::Failed(reason) => format!("failed: {}", reason),
        };
        f.debug_struct("ModelHandle")
            .field("id", &self.id)
            .field("state", &state)
            .finish()
    }
}

async fn load_classifier(config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    let model_path = Path::new(&config.model_path).to_path_buf();
    let labels_path = Path::new(&config.labels_path);

    ensure_artifact(&model_path, config.model_url.as_deref()).await?;
    ensure_artifact(labels_path, config.labels_url.as_deref()).await?;

    let labels = load_labels(labels_path).await?;
    info!("Loaded {} class labels from {}", labels.len(), config.labels_path);

    let config = config.clone();
    let classifier = tokio::task::spawn_blocking(move || {
        OnnxClassifier::from_path(&model_path, labels, &config)
    })
    .await
    .map_err(|e| Error::internal(format!("Model loading task failed: {}", e)))??;

    Ok(Arc::new(classifier))
}

async fn write_startup_error(path: &str, err: &Error) -> Result<()> {
    let contents = format!(
        "[{}] Failed to load model: {}\n\n{}\n",
        Utc::now().to_rfc3339(),
        report(err),
        Backtrace::force_capture()
    );

    tokio::fs::write(path, contents).await?;
    Ok(())
}
