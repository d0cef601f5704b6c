//! Plain-text dump of a fitted tree's split structure.
//!
//! ```text
//! |--- commit_frequency <= 1.50
//! |   |--- class: 0
//! |--- commit_frequency >  1.50
//! |   |--- has_ci <= 0.50
//! |   |   |--- class: 1
//! ```

use std::fmt::Write;

use super::tree::DecisionTree;

const SPACING: usize = 3;
const DECIMALS: usize = 2;

/// Render `tree` with `feature_names` indexed by split feature. Branches below
/// `max_depth` are summarised as `truncated branch of depth N`.
pub fn export_text(tree: &DecisionTree, feature_names: &[&str], max_depth: usize) -> String {
    let mut report = String::new();
    if tree.node_count() > 0 {
        render_node(tree, feature_names, max_depth, 0, 1, &mut report);
    }
    report
}

fn indent(depth: usize) -> String {
    let mut prefix = format!("|{}", " ".repeat(SPACING)).repeat(depth);
    prefix.truncate(prefix.len() - SPACING);
    prefix.push_str(&"-".repeat(SPACING));
    prefix
}

fn render_node(
    tree: &DecisionTree,
    feature_names: &[&str],
    max_depth: usize,
    node: usize,
    depth: usize,
    report: &mut String,
) {
    let prefix = indent(depth);

    if depth > max_depth.saturating_add(1) {
        let subtree_depth = tree.subtree_depth(node);
        if subtree_depth == 1 {
            write_leaf(tree, node, &prefix, report);
        } else {
            let _ = writeln!(report, "{prefix} truncated branch of depth {subtree_depth}");
        }
        return;
    }

    if tree.is_leaf(node) {
        write_leaf(tree, node, &prefix, report);
        return;
    }

    let name = feature_names
        .get(tree.feature[node] as usize)
        .copied()
        .unwrap_or("?");
    let threshold = format!("{:.*}", DECIMALS, tree.threshold[node]);

    let _ = writeln!(report, "{prefix} {name} <= {threshold}");
    render_node(
        tree,
        feature_names,
        max_depth,
        tree.children_left[node] as usize,
        depth + 1,
        report,
    );
    let _ = writeln!(report, "{prefix} {name} >  {threshold}");
    render_node(
        tree,
        feature_names,
        max_depth,
        tree.children_right[node] as usize,
        depth + 1,
        report,
    );
}

fn write_leaf(tree: &DecisionTree, node: usize, prefix: &str, report: &mut String) {
    let _ = writeln!(report, "{prefix} class: {}", tree.node_class(node));
}
