use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Where the classifier comes from and how images are prepared for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_id")]
    pub id: String,
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Either a `config.json` with an `id2label` map or a text file with one label per line.
    #[serde(default = "default_labels_path")]
    pub labels_path: String,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub labels_url: Option<String>,
    /// The shorter image side is scaled to this length before cropping.
    #[serde(default = "default_resize_shortest_edge")]
    pub resize_shortest_edge: u32,
    /// Side of the centered square crop fed to the network.
    #[serde(default = "default_crop_size")]
    pub crop_size: u32,
    #[serde(default = "default_channel_stats")]
    pub mean: [f32; 3],
    #[serde(default = "default_channel_stats")]
    pub std: [f32; 3],
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Set to false when the exported graph already ends in a softmax.
    #[serde(default = "default_softmax")]
    pub softmax: bool,
    #[serde(default = "default_startup_error_path")]
    pub startup_error_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: default_model_id(),
            model_path: default_model_path(),
            labels_path: default_labels_path(),
            model_url: None,
            labels_url: None,
            resize_shortest_edge: default_resize_shortest_edge(),
            crop_size: default_crop_size(),
            mean: default_channel_stats(),
            std: default_channel_stats(),
            top_k: default_top_k(),
            softmax: default_softmax(),
            startup_error_path: default_startup_error_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model_id() -> String {
    "linkanjarad/mobilenet_v2_1.0_224-plant-disease-identification".to_string()
}

fn default_model_path() -> String {
    "model/model.onnx".to_string()
}

fn default_labels_path() -> String {
    "model/config.json".to_string()
}

fn default_resize_shortest_edge() -> u32 {
    256
}

fn default_crop_size() -> u32 {
    224
}

fn default_channel_stats() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

fn default_top_k() -> usize {
    5
}

fn default_softmax() -> bool {
    true
}

fn default_startup_error_path() -> String {
    "startup_error.txt".to_string()
}
