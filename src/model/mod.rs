mod classifier;
mod decode;
mod fetch;
mod handle;
mod labels;
mod onnx;

pub use classifier::{Classifier, Prediction};
pub use decode::{DecodeError, decode_image};
pub use fetch::ensure_artifact;
pub use handle::{ModelHandle, ModelState};
pub use labels::{load_labels, parse_id2label, parse_label_lines};
pub use onnx::{OnnxClassifier, Preprocess};
