use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct HubConfig {
    id2label: HashMap<String, String>,
}

pub async fn load_labels(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let labels = if is_json {
        parse_id2label(&content)?
    } else {
        parse_label_lines(&content)
    };

    if labels.is_empty() {
        return Err(Error::labels(format!(
            "No labels found in {}",
            path.display()
        )));
    }

    Ok(labels)
}

/// Reads the `id2label` map of a model `config.json`, ordered by class index.
pub fn parse_id2label(content: &str) -> Result<Vec<String>> {
    let config: HubConfig = serde_json::from_str(content)?;

    let mut indexed = Vec::with_capacity(config.id2label.len());
    for (id, label) in config.id2label {
        let index: usize = id
            .parse()
            .map_err(|_| Error::labels(format!("Non-numeric class id in id2label: '{}'", id)))?;
        indexed.push((index, label));
    }
    indexed.sort_by_key(|(index, _)| *index);

    for (expected, (index, _)) in indexed.iter().enumerate() {
        if *index != expected {
            return Err(Error::labels(format!(
                "id2label is not contiguous: expected id {}, found {}",
                expected, index
            )));
        }
    }

    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

pub fn parse_label_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
