use crate::catalog::similarity::cosine_similarity;
use crate::catalog::{Catalog, Project};
use crate::classifier::rules::export_text;
use crate::classifier::ArtifactLoader;
use crate::error::ServiceError;
use crate::models::{Language, ModelRules, ProjectMetrics};

/// The catalog row most similar to a query.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub project: &'a Project,
    pub similarity: f64,
}

/// Scan `projects` for the highest cosine similarity to `query`.
///
/// The running best starts at 0 and only a strictly greater score replaces
/// it: ties keep the earlier row, and a query no row beats 0 on selects
/// nothing.
pub fn most_similar<'a>(projects: &'a [Project], query: &ProjectMetrics) -> Option<Selection<'a>> {
    let query = query.to_vector();
    let mut best: Option<Selection<'a>> = None;
    let mut best_score = 0.0f64;

    for project in projects {
        let Some(score) = cosine_similarity(&project.metrics.to_vector(), &query) else {
            continue;
        };
        if score > best_score {
            best_score = score;
            best = Some(Selection {
                project,
                similarity: score,
            });
        }
    }

    best
}

/// Select the most similar project of `language`.
pub fn select<'a>(
    catalog: &'a Catalog,
    language: Language,
    query: &ProjectMetrics,
) -> Result<Option<Selection<'a>>, ServiceError> {
    let projects = catalog.projects(language)?;
    let selection = most_similar(projects, query);

    match &selection {
        Some(s) => tracing::info!(
            "Selected {language} project {} (similarity {:.4}) among {} candidates",
            s.project.id,
            s.similarity,
            projects.len()
        ),
        None => tracing::info!(
            "No {language} project is more similar than 0 to the query ({} candidates)",
            projects.len()
        ),
    }

    Ok(selection)
}

/// Load every model of `project` and render its rules, in category order.
pub fn describe_models(
    project: &Project,
    loader: &dyn ArtifactLoader,
    max_depth: usize,
) -> Result<Vec<ModelRules>, ServiceError> {
    project
        .models
        .iter()
        .map(|(defect_type, path)| -> Result<ModelRules, ServiceError> {
            let artifact = loader.load(path).map_err(|e| ServiceError::Artifact {
                path: path.display().to_string(),
                message: format!("{e:#}"),
            })?;
            Ok(ModelRules {
                defect_type: *defect_type,
                rules: export_text(artifact.tree(), &artifact.columns(), max_depth),
            })
        })
        .collect()
}
