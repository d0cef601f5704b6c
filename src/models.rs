use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ecosystem a catalog (and its models) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Ansible,
    Tosca,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ansible, Language::Tosca];

    /// Parse a language tag, case-insensitively. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "ansible" => Some(Language::Ansible),
            "tosca" => Some(Language::Tosca),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ansible => "ansible",
            Language::Tosca => "tosca",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defect category a classifier was trained for.
///
/// The derived ordering is the order categories are visited in, both when
/// dumping rules and when predicting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectType {
    Conditional,
    ConfigurationData,
    Service,
    General,
}

impl DefectType {
    pub const ALL: [DefectType; 4] = [
        DefectType::Conditional,
        DefectType::ConfigurationData,
        DefectType::Service,
        DefectType::General,
    ];

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "conditional" => Some(DefectType::Conditional),
            "configuration_data" => Some(DefectType::ConfigurationData),
            "service" => Some(DefectType::Service),
            "general" => Some(DefectType::General),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectType::Conditional => "conditional",
            DefectType::ConfigurationData => "configuration_data",
            DefectType::Service => "service",
            DefectType::General => "general",
        }
    }
}

impl fmt::Display for DefectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the project metrics, in the order they appear in a similarity vector.
pub const METRIC_NAMES: [&str; 8] = [
    "comments_ratio",
    "commit_frequency",
    "core_contributors",
    "has_ci",
    "has_license",
    "iac_ratio",
    "issue_frequency",
    "repository_size",
];

/// Fixed-schema metrics describing a project. Booleans are stored as 0/1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    #[serde(default)]
    pub comments_ratio: f64,
    #[serde(default)]
    pub commit_frequency: f64,
    #[serde(default)]
    pub core_contributors: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub has_ci: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub has_license: f64,
    #[serde(default)]
    pub iac_ratio: f64,
    #[serde(default)]
    pub issue_frequency: f64,
    #[serde(default)]
    pub repository_size: f64,
}

impl ProjectMetrics {
    /// Build metrics by looking each field up by name.
    /// Flags are truncated to whole numbers.
    pub fn from_lookup(lookup: impl Fn(&str) -> f64) -> Self {
        Self {
            comments_ratio: lookup("comments_ratio"),
            commit_frequency: lookup("commit_frequency"),
            core_contributors: lookup("core_contributors"),
            has_ci: lookup("has_ci").trunc(),
            has_license: lookup("has_license").trunc(),
            iac_ratio: lookup("iac_ratio"),
            issue_frequency: lookup("issue_frequency"),
            repository_size: lookup("repository_size"),
        }
    }

    /// The similarity vector, ordered as [`METRIC_NAMES`].
    pub fn to_vector(&self) -> [f64; 8] {
        [
            self.comments_ratio,
            self.commit_frequency,
            self.core_contributors,
            self.has_ci,
            self.has_license,
            self.iac_ratio,
            self.issue_frequency,
            self.repository_size,
        ]
    }
}

/// Numbers that may be written either as JSON booleans or as numbers.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrBool {
    Bool(bool),
    Number(f64),
}

impl NumberOrBool {
    pub(crate) fn value(self) -> f64 {
        match self {
            NumberOrBool::Bool(true) => 1.0,
            NumberOrBool::Bool(false) => 0.0,
            NumberOrBool::Number(n) => n,
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(NumberOrBool::deserialize(deserializer)?.value().trunc())
}

/// Rule dump of one category's fitted tree.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelRules {
    #[serde(rename = "type")]
    pub defect_type: DefectType,
    pub rules: String,
}

/// Response of `GET /models/`. Without a match only `models` is present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub models: Vec<ModelRules>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::LessOrEqual => f.write_str("<="),
            Operator::Greater => f.write_str(">"),
        }
    }
}

/// One split on the path to a failure-prone leaf, with the threshold in the
/// caller's units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionStep {
    pub feature: String,
    pub operator: Operator,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefectDecision {
    #[serde(rename = "type")]
    pub defect_type: DefectType,
    pub decision: Vec<DecisionStep>,
}

/// Response of `GET /predictions/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub failure_prone: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<DefectDecision>,
}
