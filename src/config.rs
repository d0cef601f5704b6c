use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one `<language>/metadata.json` catalog per ecosystem
    pub models_dir: PathBuf,
    /// Base for relative artifact paths found in catalogs
    pub artifact_root: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Depth below which rule dumps are truncated
    pub rules_max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("./models"),
            artifact_root: PathBuf::from("."),
            bind_addr: "127.0.0.1:5000".to_string(),
            rules_max_depth: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("DEFECT_PREDICTOR_MODELS_DIR") {
            config.models_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("DEFECT_PREDICTOR_ARTIFACT_ROOT") {
            config.artifact_root = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("DEFECT_PREDICTOR_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("DEFECT_PREDICTOR_RULES_MAX_DEPTH") {
            if let Ok(v) = val.parse() {
                config.rules_max_depth = v;
            }
        }

        config
    }

    pub fn metadata_path(&self, language: Language) -> PathBuf {
        self.models_dir.join(language.as_str()).join("metadata.json")
    }

    /// Resolve an artifact path from a catalog against `artifact_root`.
    pub fn resolve_artifact(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.artifact_root.join(path)
        }
    }
}
