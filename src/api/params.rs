//! Lenient query-string parsing: missing or unparseable numbers become 0.

use std::collections::{BTreeMap, HashMap};

use crate::error::ServiceError;
use crate::models::{DefectType, Language, ProjectMetrics};

pub type QueryParams = HashMap<String, String>;

/// Parameters of `/predictions/` that are not metrics.
const RESERVED: [&str; 2] = ["language", "model_id"];

/// Parse a number, accepting `true`/`false` as 1/0. Anything else that is not
/// a finite number is 0.
pub fn parse_number(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        return 1.0;
    }
    if raw.eq_ignore_ascii_case("false") {
        return 0.0;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn number(params: &QueryParams, key: &str) -> f64 {
    params.get(key).map(|v| parse_number(v)).unwrap_or(0.0)
}

pub fn language(params: &QueryParams) -> Result<Language, ServiceError> {
    let tag = params.get("language").map(String::as_str).unwrap_or("");
    Language::parse(tag).ok_or_else(|| ServiceError::InvalidLanguage(tag.to_string()))
}

/// Optional download category. Absent or blank means "any"; anything else
/// must name a category.
pub fn defect_type(params: &QueryParams) -> Result<Option<DefectType>, ServiceError> {
    match params.get("defect_type").map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(label) => DefectType::parse(label)
            .map(Some)
            .ok_or_else(|| ServiceError::InvalidDefectType(label.to_string())),
    }
}

pub fn model_id(params: &QueryParams) -> i64 {
    let Some(raw) = params.get("model_id") else {
        return 0;
    };
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| v as i64)
        })
        .unwrap_or(0)
}

/// The fixed-schema query vector of `/models/`.
pub fn project_metrics(params: &QueryParams) -> ProjectMetrics {
    ProjectMetrics::from_lookup(|name| number(params, name))
}

/// Every non-reserved parameter of `/predictions/`, as a metric.
pub fn prediction_metrics(params: &QueryParams) -> BTreeMap<String, f64> {
    params
        .iter()
        .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), parse_number(v)))
        .collect()
}
