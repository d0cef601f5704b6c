use std::collections::BTreeMap;

use anyhow::Result;

use crate::catalog::Catalog;
use crate::classifier::{ArtifactLoader, ClassifierArtifact};
use crate::error::ServiceError;
use crate::models::{DecisionStep, DefectDecision, Language, Operator, PredictionResponse};

/// One row of model input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    /// Caller values, zero-filled.
    pub raw: Vec<f64>,
    /// What the tree sees: `raw` after normalization.
    pub input: Vec<f64>,
}

/// Outcome of one category's classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub failure_prone: bool,
    /// Empty unless `failure_prone`.
    pub decision: Vec<DecisionStep>,
}

/// Project `metrics` onto the artifact's columns, filling missing features
/// with 0 and dropping everything else, then normalize.
pub fn build_frame(artifact: &ClassifierArtifact, metrics: &BTreeMap<String, f64>) -> FeatureFrame {
    let columns = artifact.columns();
    let raw: Vec<f64> = columns
        .iter()
        .map(|c| metrics.get(*c).copied().unwrap_or(0.0))
        .collect();
    let input = match &artifact.estimator.normalization {
        Some(norm) => norm.transform(&raw),
        None => raw.clone(),
    };

    FeatureFrame {
        columns: columns.into_iter().map(str::to_string).collect(),
        raw,
        input,
    }
}

/// Two-decimal rounding, ties to even, matching the rule dump's `{:.2}`.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Run one classifier and, on a positive verdict, explain it.
///
/// Each split on the path (the leaf excluded) becomes a step whose threshold
/// is rescaled to caller units by `raw / input` of that feature, with a
/// non-positive `input` counted as 1. This rescale is a single-point
/// approximation, not an inverse of the normalization.
///
/// Fails if the artifact is inconsistent with its own feature list.
pub fn evaluate(artifact: &ClassifierArtifact, metrics: &BTreeMap<String, f64>) -> Result<Verdict> {
    artifact.validate()?;
    let tree = artifact.tree();
    let frame = build_frame(artifact, metrics);
    let path = tree.decision_path(&frame.input);
    let leaf = path.last().copied().unwrap_or(0);
    let failure_prone = tree.node_class(leaf).value() != 0.0;

    if !failure_prone {
        return Ok(Verdict {
            failure_prone,
            decision: Vec::new(),
        });
    }

    let decision = path
        .windows(2)
        .map(|step| {
            let (node, next) = (step[0], step[1]);
            let column = tree.feature[node] as usize;
            let original = frame.raw[column];
            let normalized = match frame.input[column] {
                v if v > 0.0 => v,
                _ => 1.0,
            };
            let operator = if next as i64 == tree.children_left[node] {
                Operator::LessOrEqual
            } else {
                Operator::Greater
            };

            DecisionStep {
                feature: frame.columns[column].clone(),
                operator,
                threshold: round2(tree.threshold[node]) * (original / normalized),
            }
        })
        .collect();

    Ok(Verdict {
        failure_prone,
        decision,
    })
}

/// Run every category model of project `model_id` against `metrics`.
pub fn predict(
    catalog: &Catalog,
    loader: &dyn ArtifactLoader,
    language: Language,
    model_id: i64,
    metrics: &BTreeMap<String, f64>,
) -> Result<PredictionResponse, ServiceError> {
    let project = catalog.find(language, model_id)?;
    let mut response = PredictionResponse::default();

    for (defect_type, path) in &project.models {
        let broken = |e: anyhow::Error| ServiceError::Artifact {
            path: path.display().to_string(),
            message: format!("{e:#}"),
        };
        let artifact = loader.load(path).map_err(broken)?;
        let verdict = evaluate(&artifact, metrics).map_err(broken)?;
        tracing::debug!(
            "{language} model {model_id} [{defect_type}]: failure_prone={}",
            verdict.failure_prone
        );

        if verdict.failure_prone {
            response.failure_prone = true;
            response.defects.push(DefectDecision {
                defect_type: *defect_type,
                decision: verdict.decision,
            });
        }
    }

    tracing::info!(
        "Prediction with {language} model {model_id}: failure_prone={} ({} categories positive)",
        response.failure_prone,
        response.defects.len()
    );

    Ok(response)
}
