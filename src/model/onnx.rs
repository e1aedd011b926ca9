use super::classifier::{Classifier, Prediction, postprocess};
use crate::{Error, Result, config::ModelConfig};
use image::{RgbImage, imageops, imageops::FilterType};
use std::path::Path;
use tracing::debug;
use tract_onnx::prelude::*;

type Plan = TypedRunnableModel<TypedModel>;

/// Image preparation matching the MobileNetV2 image processor: scale the shorter side
/// with bilinear filtering, take a centered square crop, rescale to [0, 1] and normalize
/// per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocess {
    pub resize_shortest_edge: u32,
    pub crop_size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Preprocess {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            resize_shortest_edge: config.resize_shortest_edge,
            crop_size: config.crop_size,
            mean: config.mean,
            std: config.std,
        }
    }
}

/// Image classifier backed by an ONNX graph executed with tract.
///
/// Expects a single NCHW `f32` input of `[1, 3, crop_size, crop_size]` and a first
/// output holding one score per class.
pub struct OnnxClassifier {
    plan: Plan,
    labels: Vec<String>,
    preprocess: Preprocess,
    top_k: usize,
    apply_softmax: bool,
}

impl OnnxClassifier {
    pub fn from_path(path: &Path, labels: Vec<String>, config: &ModelConfig) -> Result<Self> {
        let size = config.crop_size as usize;
        debug!(
            "Building ONNX plan from {} with input [1, 3, {}, {}]",
            path.display(),
            size,
            size
        );

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                Error::model(format!(
                    "Failed to load ONNX model {}: {:#}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            plan,
            labels,
            preprocess: Preprocess::from_config(config),
            top_k: config.top_k,
            apply_softmax: config.softmax,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, image: &RgbImage) -> Result<Vec<Prediction>> {
        let input = to_input_tensor(image, &self.preprocess)?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| Error::model(format!("Inference failed: {:#}", e)))?;

        let output = outputs
            .first()
            .ok_or_else(|| Error::model("Model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| Error::model(format!("Output is not f32: {}", e)))?;
        let raw: Vec<f32> = view.iter().copied().collect();

        Ok(postprocess(raw, &self.labels, self.top_k, self.apply_softmax))
    }
}

/// Output size after scaling the shorter side to `shortest_edge`, keeping the aspect ratio.
fn shortest_edge_dims(width: u32, height: u32, shortest_edge: u32) -> (u32, u32) {
    let scale = |long: u32, short: u32| (long as u64 * shortest_edge as u64 / short as u64) as u32;

    if width <= height {
        (shortest_edge, scale(height, width))
    } else {
        (scale(width, height), shortest_edge)
    }
}

pub(crate) fn resize_and_crop(image: &RgbImage, preprocess: &Preprocess) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::model("Image has no pixels"));
    }

    let (new_width, new_height) =
        shortest_edge_dims(width, height, preprocess.resize_shortest_edge);
    let resized = if (new_width, new_height) == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, new_width, new_height, FilterType::Triangle)
    };

    let crop = preprocess.crop_size;
    if new_width < crop || new_height < crop {
        return Err(Error::model(format!(
            "Resized image {}x{} is smaller than crop size {}",
            new_width, new_height, crop
        )));
    }

    let left = (new_width - crop) / 2;
    let top = (new_height - crop) / 2;
    Ok(imageops::crop_imm(&resized, left, top, crop, crop).to_image())
}

/// Builds the `[1, 3, crop, crop]` input; pixel (x, y) of channel c lands at
/// `c * crop * crop + y * crop + x`.
pub(crate) fn to_input_tensor(image: &RgbImage, preprocess: &Preprocess) -> Result<Tensor> {
    let cropped = resize_and_crop(image, preprocess)?;
    let side = preprocess.crop_size as usize;
    let plane = side * side;

    let mut data = vec![0f32; 3 * plane];
    for (x, y, pixel) in cropped.enumerate_pixels() {
        for c in 0..3 {
            let value = pixel[c] as f32 / 255.0;
            data[c * plane + y as usize * side + x as usize] =
                (value - preprocess.mean[c]) / preprocess.std[c];
        }
    }

    let array = tract_ndarray::Array4::from_shape_vec((1, 3, side, side), data)
        .map_err(|e| Error::model(format!("Invalid input tensor shape: {}", e)))?;
    Ok(array.into_tensor())
}
