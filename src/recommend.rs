//! Static remediation advice keyed by disease-label substrings.

pub const FALLBACK_RECOMMENDATION: &str = "Consult an expert for detailed advice.";

/// Ordered (label substring, advice) pairs. The first key contained in a label wins,
/// so entries must stay in this order.
pub const RECOMMENDATIONS: &[(&str, &str)] = &[
    ("healthy", "Your crop looks healthy! Keep up the good work."),
    ("Bacterial_spot", "Use copper-based bactericides."),
    ("Early_blight", "Apply fungicides like Mancozeb or Chlorothalonil."),
    ("Late_blight", "Monitor weather and apply appropriate fungicides."),
    ("Leaf_Mold", "Improve air circulation and reduce humidity."),
    ("Powdery_mildew", "Use sulfur-based fungicides or neem oil."),
    ("Common_rust", "Apply fungicides early and plant resistant varieties."),
    ("Northern_Leaf_Blight", "Use resistant hybrids and fungicides."),
    ("Black_rot", "Remove infected plant parts and use fungicides."),
    ("Esca", "Prune infected areas; no cure for established vines."),
    ("Leaf_blight", "Use appropriate fungicides."),
    ("Haunglongbing", "Remove infected trees; control pysllids."),
    ("Leaf_scorch", "Ensure proper watering and nutrition."),
    ("Septoria_leaf_spot", "Remove infected leaves and use fungicides."),
    ("Spider_mites", "Use miticides or neem oil."),
    ("Target_Spot", "Apply fungicides and improve aeration."),
    ("Mosaic_virus", "Remove infected plants; control aphids."),
    ("Yellow_Leaf_Curl", "Control whiteflies; use resistant varieties."),
];

pub fn recommend(label: &str) -> &'static str {
    RECOMMENDATIONS
        .iter()
        .find(|(key, _)| label.contains(key))
        .map(|(_, advice)| *advice)
        .unwrap_or(FALLBACK_RECOMMENDATION)
}

/// Human-readable class name: underscores become spaces.
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}
