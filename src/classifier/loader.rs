//! Remote model loading.
//!
//! A classifier lives at a base URL exposing `model.json` (the checkpoint
//! graph) and `metadata.json` (the label set). Loading verifies the
//! checkpoint is reachable and parses the labels; running inference stays
//! with the external engine.

use crate::error::{Result, SentryError};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct ModelMetadata {
    #[serde(rename = "wordLabels")]
    word_labels: Vec<String>,
}

/// Descriptor of a successfully loaded classifier.
#[derive(Debug, Clone)]
pub struct ClassifierModel {
    base_url: Url,
    labels: Vec<String>,
}

impl ClassifierModel {
    /// Build a descriptor from an already-known label set. Index 1 must
    /// exist: it is the target label detections fire on.
    pub fn new(base_url: Url, labels: Vec<String>) -> Result<Self> {
        if labels.len() < 2 {
            return Err(SentryError::ModelLoad(format!(
                "model at {} must expose a background label and a target label, got {}",
                base_url,
                labels.len()
            )));
        }
        Ok(Self { base_url, labels })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label at the target index, the one detections fire on.
    pub fn target_label(&self) -> &str {
        &self.labels[1]
    }
}

/// Fetch and validate a classifier from its base URL.
pub async fn load(client: &reqwest::Client, base_url: &Url) -> Result<ClassifierModel> {
    let checkpoint_url = base_url
        .join("model.json")
        .map_err(|e| SentryError::ModelLoad(format!("invalid model URL {}: {}", base_url, e)))?;
    let metadata_url = base_url
        .join("metadata.json")
        .map_err(|e| SentryError::ModelLoad(format!("invalid model URL {}: {}", base_url, e)))?;

    log::info!("📥 Loading classifier from {}", base_url);

    client
        .get(checkpoint_url.clone())
        .send()
        .await
        .map_err(|e| SentryError::ModelLoad(format!("failed to fetch {}: {}", checkpoint_url, e)))?
        .error_for_status()
        .map_err(|e| SentryError::ModelLoad(format!("checkpoint fetch failed: {}", e)))?;

    let metadata: ModelMetadata = client
        .get(metadata_url.clone())
        .send()
        .await
        .map_err(|e| SentryError::ModelLoad(format!("failed to fetch {}: {}", metadata_url, e)))?
        .error_for_status()
        .map_err(|e| SentryError::ModelLoad(format!("metadata fetch failed: {}", e)))?
        .json()
        .await
        .map_err(|e| {
            SentryError::ModelLoad(format!("metadata at {} is not valid JSON: {}", metadata_url, e))
        })?;

    let model = ClassifierModel::new(base_url.clone(), metadata.word_labels)?;
    log::info!(
        "✅ Classifier ready ({} labels, target '{}')",
        model.labels().len(),
        model.target_label()
    );
    Ok(model)
}
