//! Bottom-up subtree measurement.

use tracing::instrument;

use crate::domain::entities::{LayoutConfig, MeasuredNode, TreeNode, TreeNodeRef};

/// Computes the footprint of `node` and all of its descendants.
///
/// Widths accumulate along the horizontal sibling axis and heights along the
/// vertical one, each with one spacing gap between consecutive children. A
/// subtree is never smaller than a single node box.
///
/// Recursion depth equals tree depth.
#[instrument(level = "trace", skip_all, fields(id = %node.id))]
pub fn measure(node: &TreeNodeRef, config: &LayoutConfig) -> MeasuredNode {
    let children = node.children();
    if children.is_empty() {
        return MeasuredNode {
            node: node.clone(),
            width: config.node_width,
            height: config.node_height,
            children: Vec::new(),
        };
    }

    let measured: Vec<MeasuredNode> = children.iter().map(|c| measure(c, config)).collect();
    let gaps = (measured.len() - 1) as f64;
    let total_width = measured.iter().map(|m| m.width).sum::<f64>() + config.space_x * gaps;
    let total_height = measured.iter().map(|m| m.height).sum::<f64>() + config.space_y * gaps;

    MeasuredNode {
        node: node.clone(),
        width: config.node_width.max(total_width),
        height: config.node_height.max(total_height),
        children: measured,
    }
}

/// Number of levels below and including `node`: 1 for a leaf.
pub fn tree_depth(node: &TreeNode) -> usize {
    1 + node
        .children()
        .iter()
        .map(|child| tree_depth(child))
        .max()
        .unwrap_or(0)
}
