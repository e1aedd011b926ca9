use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use leafscan::{
    config::ModelConfig,
    model::{Classifier, ModelHandle},
    server::{handlers::AppState, router},
};
use serde_json::Value;
use std::{io::Cursor, sync::Arc};
use tempfile::TempDir;

pub const TEST_MODEL_ID: &str = "test/plant-disease-model";
pub const BOUNDARY: &str = "leafscan-test-boundary";
pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

pub fn ready_app(classifier: impl Classifier + 'static) -> Router {
    app_with(ModelHandle::ready(TEST_MODEL_ID, Arc::new(classifier)))
}

pub fn unloaded_app() -> Router {
    app_with(ModelHandle::failed(TEST_MODEL_ID, "model file missing"))
}

pub fn app_with(handle: ModelHandle) -> Router {
    router(AppState::new(handle), TEST_UPLOAD_LIMIT)
}

/// A small solid-color PNG
pub fn png_bytes() -> Vec<u8> {
    solid_png(8, 8, [34, 139, 34])
}

pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(rgb));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());

    let disposition = match filename {
        Some(filename) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            field, filename
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field),
    };
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn predict_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    predict_request(multipart_body("file", Some(filename), content))
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Model config whose artifacts all live in a temporary directory.
pub fn temp_model_config(dir: &TempDir) -> ModelConfig {
    ModelConfig {
        id: TEST_MODEL_ID.to_string(),
        model_path: dir.path().join("model.onnx").to_string_lossy().to_string(),
        labels_path: dir.path().join("labels.txt").to_string_lossy().to_string(),
        startup_error_path: dir
            .path()
            .join("startup_error.txt")
            .to_string_lossy()
            .to_string(),
        ..ModelConfig::default()
    }
}
