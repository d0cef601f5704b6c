//! Read-only catalog of known projects, one table per ecosystem language.

pub mod similarity;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ServiceError;
use crate::models::{DefectType, Language, ProjectMetrics};

/// A catalog row: a project with trained models for one or more defect categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub metrics: ProjectMetrics,
    /// Artifact path per category; iterates in category order.
    pub models: BTreeMap<DefectType, PathBuf>,
}

impl Project {
    /// Artifact to hand out for download: the requested category, or the
    /// last category the project has a model for.
    pub fn download_artifact(&self, defect_type: Option<DefectType>) -> Option<&Path> {
        let path = match defect_type {
            Some(t) => self.models.get(&t),
            None => self.models.values().next_back(),
        };
        path.map(PathBuf::as_path)
    }
}

/// On-disk shape of a catalog entry.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: i64,
    #[serde(flatten)]
    metrics: ProjectMetrics,
    #[serde(default)]
    models: BTreeMap<String, Option<PathBuf>>,
    /// Single generic model of the simplified catalog layout.
    #[serde(default)]
    model: Option<PathBuf>,
}

impl CatalogEntry {
    fn into_project(self, config: &Config) -> Project {
        let mut models = BTreeMap::new();

        for (label, path) in self.models {
            let Some(defect_type) = DefectType::parse(&label) else {
                tracing::warn!("Project {}: ignoring unknown defect category '{label}'", self.id);
                continue;
            };
            match path {
                Some(path) if !path.as_os_str().is_empty() => {
                    models.insert(defect_type, config.resolve_artifact(&path));
                }
                _ => {}
            }
        }

        if let Some(path) = self.model.filter(|p| !p.as_os_str().is_empty()) {
            models
                .entry(DefectType::General)
                .or_insert_with(|| config.resolve_artifact(&path));
        }

        Project {
            id: self.id,
            metrics: self.metrics,
            models,
        }
    }
}

/// Immutable after construction; safe to share across request handlers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<Language, Vec<Project>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used for synthetic catalogs.
    pub fn with_projects(mut self, language: Language, projects: Vec<Project>) -> Self {
        self.tables.insert(language, projects);
        self
    }

    /// Load every language catalog found under `config.models_dir`.
    ///
    /// A missing catalog file leaves the language unsupported; a malformed one
    /// is an error.
    pub fn load(config: &Config) -> Result<Self> {
        let mut catalog = Self::new();

        for language in Language::ALL {
            let path = config.metadata_path(language);
            if !path.exists() {
                tracing::warn!(
                    "No catalog for {language} at {}; {language} requests will be rejected",
                    path.display()
                );
                continue;
            }
            let projects = Self::load_file(&path, config)?;
            tracing::info!("Loaded {} {language} projects from {}", projects.len(), path.display());
            catalog.tables.insert(language, projects);
        }

        Ok(catalog)
    }

    /// Parse one `metadata.json` catalog file.
    pub fn load_file(path: &Path, config: &Config) -> Result<Vec<Project>> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
        Ok(entries.into_iter().map(|e| e.into_project(config)).collect())
    }

    /// Languages with a loaded catalog, in a stable order.
    pub fn languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|l| self.tables.contains_key(l))
            .collect()
    }

    pub fn projects(&self, language: Language) -> Result<&[Project], ServiceError> {
        self.tables
            .get(&language)
            .map(Vec::as_slice)
            .ok_or(ServiceError::UnsupportedOperation(language))
    }

    /// Look a project up by id; the first row with a matching id wins.
    pub fn find(&self, language: Language, id: i64) -> Result<&Project, ServiceError> {
        self.projects(language)?
            .iter()
            .find(|p| p.id == id)
            .ok_or(ServiceError::ModelNotFound { language, id })
    }
}
