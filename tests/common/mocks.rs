use image::RgbImage;
use leafscan::{
    Error, Result,
    model::{Classifier, Prediction},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

enum Behavior {
    Predictions(Vec<Prediction>),
    Fail(String),
    Panic,
}

/// Mock classifier for testing
pub struct MockClassifier {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockClassifier {
    pub fn with_predictions(predictions: Vec<Prediction>) -> Self {
        Self {
            behavior: Behavior::Predictions(predictions),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_top(label: &str, score: f32) -> Self {
        Self::with_predictions(vec![
            Prediction::new(label, score),
            Prediction::new("Tomato___healthy", (1.0 - score).max(0.0)),
        ])
    }

    pub fn with_error(message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn panicking() -> Self {
        Self {
            behavior: Behavior::Panic,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `classify` invocations.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Classifier for MockClassifier {
    fn classify(&self, _image: &RgbImage) -> Result<Vec<Prediction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Predictions(predictions) => Ok(predictions.clone()),
            Behavior::Fail(message) => Err(Error::model(message.clone())),
            Behavior::Panic => panic!("mock classifier panicked"),
        }
    }
}
