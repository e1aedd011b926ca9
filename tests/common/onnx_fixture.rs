//! A minimal ONNX classifier written out as raw protobuf:
//! `input [1, 3, s, s] -> GlobalAveragePool -> Flatten -> output [1, 3]`.
//!
//! Each output score is the mean of one normalized input channel, so the winning
//! class is decided by the dominant color of the uploaded image.

use std::path::Path;

const IR_VERSION: u64 = 7;
const OPSET_VERSION: u64 = 13;
const ELEM_TYPE_FLOAT: u64 = 1;

/// Labels in output order: red, green, blue.
pub const CHANNEL_LABELS: [&str; 3] = [
    "Tomato___Early_blight",
    "Apple___healthy",
    "Corn___Common_rust",
];

fn varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn int_field(out: &mut Vec<u8>, field: u64, value: u64) {
    varint(out, field << 3);
    varint(out, value);
}

fn bytes_field(out: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    varint(out, (field << 3) | 2);
    varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

fn node(op_type: &str, input: &str, output: &str) -> Vec<u8> {
    let mut msg = Vec::new();
    bytes_field(&mut msg, 1, input.as_bytes());
    bytes_field(&mut msg, 2, output.as_bytes());
    bytes_field(&mut msg, 3, op_type.to_lowercase().as_bytes());
    bytes_field(&mut msg, 4, op_type.as_bytes());
    msg
}

fn float_tensor_info(name: &str, dims: &[u64]) -> Vec<u8> {
    let mut shape = Vec::new();
    for dim in dims {
        let mut dimension = Vec::new();
        int_field(&mut dimension, 1, *dim);
        bytes_field(&mut shape, 1, &dimension);
    }

    let mut tensor = Vec::new();
    int_field(&mut tensor, 1, ELEM_TYPE_FLOAT);
    bytes_field(&mut tensor, 2, &shape);

    let mut type_proto = Vec::new();
    bytes_field(&mut type_proto, 1, &tensor);

    let mut value_info = Vec::new();
    bytes_field(&mut value_info, 1, name.as_bytes());
    bytes_field(&mut value_info, 2, &type_proto);
    value_info
}

/// Serialized ModelProto for a `side x side` input.
pub fn channel_mean_model(side: u64) -> Vec<u8> {
    let mut graph = Vec::new();
    bytes_field(&mut graph, 1, &node("GlobalAveragePool", "input", "pooled"));
    bytes_field(&mut graph, 1, &node("Flatten", "pooled", "output"));
    bytes_field(&mut graph, 2, b"channel-mean");
    bytes_field(&mut graph, 11, &float_tensor_info("input", &[1, 3, side, side]));
    bytes_field(&mut graph, 12, &float_tensor_info("output", &[1, 3]));

    let mut opset = Vec::new();
    int_field(&mut opset, 2, OPSET_VERSION);

    let mut model = Vec::new();
    int_field(&mut model, 1, IR_VERSION);
    bytes_field(&mut model, 7, &graph);
    bytes_field(&mut model, 8, &opset);
    model
}

/// Writes the model and a matching one-label-per-line file.
pub async fn write_channel_mean_model(model_path: &Path, labels_path: &Path, side: u64) {
    tokio::fs::write(model_path, channel_mean_model(side))
        .await
        .unwrap();
    tokio::fs::write(labels_path, CHANNEL_LABELS.join("\n"))
        .await
        .unwrap();
}
