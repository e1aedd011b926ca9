use crate::Result;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// A single ranked candidate produced by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Opaque image classifier. Implementations are blocking and must return candidates
/// ordered from highest to lowest score.
pub trait Classifier: Send + Sync {
    fn classify(&self, image: &RgbImage) -> Result<Vec<Prediction>>;
}

pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }

    exps.into_iter().map(|e| e / sum).collect()
}

/// Pairs scores with labels by index, sorts descending and keeps the best `top_k`.
/// Non-finite scores are dropped.
pub(crate) fn rank(scores: &[f32], labels: &[String], top_k: usize) -> Vec<Prediction> {
    let mut ranked: Vec<Prediction> = scores
        .iter()
        .enumerate()
        .filter(|(_, score)| score.is_finite())
        .map(|(i, score)| {
            let label = labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{}", i));
            Prediction::new(label, *score)
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k);
    ranked
}

/// Turns raw network output into ranked candidates.
pub(crate) fn postprocess(
    raw: Vec<f32>,
    labels: &[String],
    top_k: usize,
    apply_softmax: bool,
) -> Vec<Prediction> {
    let scores = if apply_softmax { softmax(&raw) } else { raw };
    rank(&scores, labels, top_k)
}
