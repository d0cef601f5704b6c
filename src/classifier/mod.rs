//! Fitted classifier artifacts: a normalization step plus a decision tree,
//! exported from training as JSON and consumed read-only.

pub mod rules;
pub mod scaler;
pub mod tree;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use scaler::Normalization;
pub use tree::{ClassLabel, DecisionTree};

/// Named pipeline steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimator {
    #[serde(default)]
    pub normalization: Option<Normalization>,
    pub classification: DecisionTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Features used at training time.
    pub selected_features: Vec<String>,
    pub estimator: Estimator,
}

impl ClassifierArtifact {
    /// Input columns in the order the tree indexes them: selected features,
    /// sorted, duplicates removed.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.selected_features.iter().map(String::as_str).collect();
        columns.sort_unstable();
        columns.dedup();
        columns
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.estimator.classification
    }

    pub fn validate(&self) -> Result<()> {
        let n_features = self.columns().len();
        self.tree().validate(n_features)?;
        if let Some(norm) = &self.estimator.normalization {
            norm.validate(n_features).map_err(anyhow::Error::msg)?;
        }
        Ok(())
    }
}

/// Source of classifier artifacts. Artifacts are loaded per request and
/// never cached.
pub trait ArtifactLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<ClassifierArtifact>;
}

/// Reads JSON artifact files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileLoader;

impl ArtifactLoader for JsonFileLoader {
    fn load(&self, path: &Path) -> Result<ClassifierArtifact> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let artifact: ClassifierArtifact = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        artifact
            .validate()
            .with_context(|| format!("Invalid artifact {}", path.display()))?;
        Ok(artifact)
    }
}

/// Serves artifacts registered in memory under the paths a catalog refers to.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    artifacts: HashMap<PathBuf, ClassifierArtifact>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, artifact: ClassifierArtifact) {
        self.artifacts.insert(path.into(), artifact);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, artifact: ClassifierArtifact) -> Self {
        self.insert(path, artifact);
        self
    }
}

impl ArtifactLoader for InMemoryLoader {
    fn load(&self, path: &Path) -> Result<ClassifierArtifact> {
        let artifact = self
            .artifacts
            .get(path)
            .cloned()
            .with_context(|| format!("No artifact registered at {}", path.display()))?;
        artifact.validate()?;
        Ok(artifact)
    }
}
