//! Integration tests for the selection and prediction pipeline.
//!
//! Catalogs and artifacts are written to a temp directory and read back the
//! way the service reads them at startup.

use std::collections::BTreeMap;
use std::path::Path;

use defect_predictor::catalog::Catalog;
use defect_predictor::classifier::{
    ClassLabel, ClassifierArtifact, DecisionTree, Estimator, JsonFileLoader, Normalization,
};
use defect_predictor::config::Config;
use defect_predictor::engine::{describe_models, predict, select};
use defect_predictor::error::ServiceError;
use defect_predictor::models::{DefectType, Language, Operator, ProjectMetrics};

/// commit_frequency <= 1.5 -> clean, else has_ci <= 0.5 -> failure-prone.
fn ci_artifact(normalization: Option<Normalization>) -> ClassifierArtifact {
    ClassifierArtifact {
        selected_features: vec!["commit_frequency".to_string(), "has_ci".to_string()],
        estimator: Estimator {
            normalization,
            classification: DecisionTree {
                classes: vec![ClassLabel::Number(0.0), ClassLabel::Number(1.0)],
                children_left: vec![1, -1, 3, -1, -1],
                children_right: vec![2, -1, 4, -1, -1],
                feature: vec![0, -2, 1, -2, -2],
                threshold: vec![1.5, -2.0, 0.5, -2.0, -2.0],
                value: vec![
                    vec![8.0, 4.0],
                    vec![5.0, 0.0],
                    vec![3.0, 4.0],
                    vec![0.0, 4.0],
                    vec![3.0, 0.0],
                ],
            },
        },
    }
}

/// iac_ratio <= 0.3 -> failure-prone, else clean.
fn iac_artifact() -> ClassifierArtifact {
    ClassifierArtifact {
        selected_features: vec!["iac_ratio".to_string()],
        estimator: Estimator {
            normalization: Some(Normalization::Standard {
                mean: Some(vec![0.5]),
                scale: Some(vec![0.25]),
            }),
            classification: DecisionTree {
                classes: vec![ClassLabel::Number(0.0), ClassLabel::Number(1.0)],
                children_left: vec![1, -1, -1],
                children_right: vec![2, -1, -1],
                feature: vec![0, -2, -2],
                threshold: vec![-0.8, -2.0, -2.0],
                value: vec![vec![5.0, 5.0], vec![0.0, 5.0], vec![5.0, 0.0]],
            },
        },
    }
}

fn write_json(path: &Path, value: &impl serde::Serialize) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Two ansible projects (7 and 8) with relative artifact paths; no tosca catalog.
fn setup(root: &Path) -> Config {
    write_json(
        &root.join("artifacts/7_conditional.json"),
        &ci_artifact(None),
    );
    write_json(&root.join("artifacts/7_general.json"), &iac_artifact());
    write_json(
        &root.join("artifacts/8_general.json"),
        &ci_artifact(Some(Normalization::MinMax {
            scale: vec![0.25, 1.0],
            min: vec![0.0, 0.0],
        })),
    );

    let catalog = serde_json::json!([
        {
            "id": 7,
            "comments_ratio": 0.5, "commit_frequency": 0.2, "core_contributors": 3,
            "has_ci": true, "has_license": true, "iac_ratio": 0.1,
            "issue_frequency": 0.05, "repository_size": 1000,
            "models": {
                "conditional": "artifacts/7_conditional.json",
                "general": "artifacts/7_general.json"
            }
        },
        {
            "id": 8,
            "comments_ratio": 0.1, "commit_frequency": 4.0, "core_contributors": 12,
            "has_ci": false, "has_license": true, "iac_ratio": 0.6,
            "issue_frequency": 1.5, "repository_size": 20,
            "model": "artifacts/8_general.json"
        }
    ]);
    write_json(&root.join("models/ansible/metadata.json"), &catalog);

    Config {
        models_dir: root.join("models"),
        artifact_root: root.to_path_buf(),
        ..Config::default()
    }
}

fn metrics(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_identical_metrics_select_project_seven() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&setup(dir.path())).unwrap();

    let query = ProjectMetrics {
        comments_ratio: 0.5,
        commit_frequency: 0.2,
        core_contributors: 3.0,
        has_ci: 1.0,
        has_license: 1.0,
        iac_ratio: 0.1,
        issue_frequency: 0.05,
        repository_size: 1000.0,
    };
    let selection = select(&catalog, Language::Ansible, &query).unwrap().unwrap();
    assert_eq!(selection.project.id, 7);
    assert!((selection.similarity - 1.0).abs() < 1e-9);
}

#[test]
fn test_selected_project_rules_for_every_category() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let catalog = Catalog::load(&config).unwrap();

    let project = catalog.find(Language::Ansible, 7).unwrap();
    let rules = describe_models(project, &JsonFileLoader, config.rules_max_depth).unwrap();

    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].defect_type, DefectType::Conditional);
    assert!(rules[0].rules.contains("|   |--- has_ci <= 0.50"));
    assert_eq!(rules[1].defect_type, DefectType::General);
    assert!(rules[1].rules.starts_with("|--- iac_ratio <= -0.80\n"));
}

#[test]
fn test_unknown_model_id_yields_no_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&setup(dir.path())).unwrap();

    let result = predict(&catalog, &JsonFileLoader, Language::Ansible, 999, &metrics(&[]));
    assert!(matches!(
        result,
        Err(ServiceError::ModelNotFound { language: Language::Ansible, id: 999 })
    ));
}

#[test]
fn test_language_without_catalog_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&setup(dir.path())).unwrap();

    assert!(matches!(
        predict(&catalog, &JsonFileLoader, Language::Tosca, 7, &metrics(&[])),
        Err(ServiceError::UnsupportedOperation(Language::Tosca))
    ));
    assert!(matches!(
        select(&catalog, Language::Tosca, &ProjectMetrics::default()),
        Err(ServiceError::UnsupportedOperation(Language::Tosca))
    ));
}

#[test]
fn test_missing_feature_is_zero_filled() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&setup(dir.path())).unwrap();

    // Project 8's only model needs has_ci; the caller never sends it.
    // commit_frequency 8.0 scales to 2.0, past the 1.5 split.
    let response = predict(
        &catalog,
        &JsonFileLoader,
        Language::Ansible,
        8,
        &metrics(&[("commit_frequency", 8.0)]),
    )
    .unwrap();

    assert!(response.failure_prone);
    assert_eq!(response.defects.len(), 1);
    let decision = &response.defects[0].decision;
    assert_eq!(decision.len(), 2);
    assert_eq!(decision[0].feature, "commit_frequency");
    assert_eq!(decision[0].operator, Operator::Greater);
    // round(1.5, 2) * (8.0 / 2.0)
    assert!((decision[0].threshold - 6.0).abs() < 1e-9);
    assert_eq!(decision[1].feature, "has_ci");
    assert_eq!(decision[1].operator, Operator::LessOrEqual);
}

#[test]
fn test_standard_scaled_model_explains_in_original_units() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&setup(dir.path())).unwrap();

    // iac_ratio 0.2 -> (0.2 - 0.5) / 0.25 = -1.2 <= -0.8: failure-prone.
    // The normalized value is negative, so the threshold is scaled by 0.2 / 1.
    let response = predict(
        &catalog,
        &JsonFileLoader,
        Language::Ansible,
        7,
        &metrics(&[("iac_ratio", 0.2), ("commit_frequency", 1.0)]),
    )
    .unwrap();

    assert!(response.failure_prone);
    assert_eq!(response.defects.len(), 1);
    assert_eq!(response.defects[0].defect_type, DefectType::General);
    let step = &response.defects[0].decision[0];
    assert_eq!(step.feature, "iac_ratio");
    assert_eq!(step.operator, Operator::LessOrEqual);
    assert!((step.threshold - (-0.8 * 0.2)).abs() < 1e-9);
}

#[test]
fn test_repeated_predictions_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&setup(dir.path())).unwrap();
    let input = metrics(&[("commit_frequency", 2.0), ("iac_ratio", 0.1)]);

    let runs: Vec<Vec<u8>> = (0..5)
        .map(|_| {
            let response =
                predict(&catalog, &JsonFileLoader, Language::Ansible, 7, &input).unwrap();
            serde_json::to_vec(&response).unwrap()
        })
        .collect();
    assert!(runs.iter().all(|r| r == &runs[0]));
}
