use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The scoring model a run asks the service for.
///
/// Example model file:
/// ```json
/// { "name": "wp10", "context": "enwiki", "version": "0.8.2" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelInfo {
    /// Model name as known to the scoring service
    pub name: String,

    /// Wiki the model is trained for (e.g. "enwiki")
    pub context: String,

    /// Expected model version; a mismatch with the service is logged
    #[serde(default)]
    pub version: Option<String>,
}

impl ModelInfo {
    /// Load and validate a model file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file at {}", path.display()))?;

        let model: ModelInfo = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse model file {}", path.display()))?;

        if model.name.trim().is_empty() {
            bail!("Model file {}: name must not be empty", path.display());
        }
        if model.context.trim().is_empty() {
            bail!("Model file {}: context must not be empty", path.display());
        }

        Ok(model)
    }
}
