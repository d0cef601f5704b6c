use std::sync::Arc;

use crate::catalog::Catalog;
use crate::classifier::{ArtifactLoader, JsonFileLoader};
use crate::config::Config;

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub loader: Arc<dyn ArtifactLoader>,
}

impl AppState {
    /// Load the catalogs named by `config` and read artifacts from disk.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = Catalog::load(&config)?;
        if catalog.languages().is_empty() {
            tracing::warn!(
                "No catalogs found under {}; every request will be rejected",
                config.models_dir.display()
            );
        }
        Ok(Self::with_parts(config, catalog, Arc::new(JsonFileLoader)))
    }

    pub fn with_parts(config: Config, catalog: Catalog, loader: Arc<dyn ArtifactLoader>) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            loader,
        }
    }
}
