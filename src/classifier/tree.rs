use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Child index marking a leaf.
pub const TREE_LEAF: i64 = -1;

/// A fitted binary decision tree in flat-array form.
///
/// Node `i` splits on `feature[i]` at `threshold[i]`: samples with
/// `x[feature] <= threshold` go to `children_left[i]`, the rest to
/// `children_right[i]`. `value[i]` holds per-class weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub classes: Vec<ClassLabel>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("tree has no classes")]
    NoClasses,
    #[error("node arrays disagree in length")]
    LengthMismatch,
    #[error("node {node}: child {child} is out of range")]
    BadChild { node: usize, child: i64 },
    #[error("node {node}: split feature {feature} is out of range for {n_features} features")]
    BadFeature {
        node: usize,
        feature: i64,
        n_features: usize,
    },
    #[error("node {node}: expected {expected} class weights, got {got}")]
    BadValue {
        node: usize,
        expected: usize,
        got: usize,
    },
}

/// Target label as exported: booleans keep their form for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Bool(bool),
    Number(f64),
}

impl ClassLabel {
    /// Numeric value; `false`/`true` count as 0/1.
    pub fn value(self) -> f64 {
        match self {
            ClassLabel::Bool(b) => f64::from(u8::from(b)),
            ClassLabel::Number(n) => n,
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Bool(true) => f.write_str("True"),
            ClassLabel::Bool(false) => f.write_str("False"),
            ClassLabel::Number(n) => write!(f, "{n}"),
        }
    }
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    /// Check the structure so traversal can index without panicking and
    /// always terminates: every child index points past its parent.
    pub fn validate(&self, n_features: usize) -> Result<(), TreeError> {
        let n = self.node_count();
        if n == 0 {
            return Err(TreeError::Empty);
        }
        if self.classes.is_empty() {
            return Err(TreeError::NoClasses);
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(TreeError::LengthMismatch);
        }

        for node in 0..n {
            let got = self.value[node].len();
            if got != self.classes.len() {
                return Err(TreeError::BadValue {
                    node,
                    expected: self.classes.len(),
                    got,
                });
            }
            if self.is_leaf(node) {
                continue;
            }
            for child in [self.children_left[node], self.children_right[node]] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(TreeError::BadChild { node, child });
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(TreeError::BadFeature {
                    node,
                    feature,
                    n_features,
                });
            }
        }

        Ok(())
    }

    /// Node ids visited for `x`, root first, leaf last. Requires a tree that
    /// passed [`validate`](Self::validate) for `x.len()` features.
    pub(crate) fn decision_path(&self, x: &[f64]) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = 0usize;
        loop {
            path.push(node);
            if self.is_leaf(node) {
                return path;
            }
            let value = x[self.feature[node] as usize];
            node = if value <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }

    /// Class label of a node: the first class with the largest weight.
    pub fn node_class(&self, node: usize) -> ClassLabel {
        let weights = &self.value[node];
        let mut best = 0usize;
        for (i, w) in weights.iter().enumerate() {
            if *w > weights[best] {
                best = i;
            }
        }
        self.classes[best]
    }

    /// Number of levels in the subtree rooted at `node` (a leaf counts 1).
    pub fn subtree_depth(&self, node: usize) -> usize {
        if self.is_leaf(node) {
            return 1;
        }
        let left = self.subtree_depth(self.children_left[node] as usize);
        let right = self.subtree_depth(self.children_right[node] as usize);
        1 + left.max(right)
    }
}
