//! Top-down placement of a measured tree.

use tracing::instrument;

use crate::domain::entities::{
    Bound, Flow, LayoutConfig, Line, MeasuredNode, PositionedTreeNode, TreeNode,
};
use crate::domain::measure::tree_depth;

/// Places `measured` and its descendants.
///
/// `depth` fixes the node on the primary axis (levels advance by node size
/// plus spacing). `offset` is the start of the span this subtree owns on the
/// secondary axis; the node box is centered inside it. Children receive
/// consecutive spans, each one spacing unit after the previous.
///
/// `flow` must be the orientation the caller lays out in: the node
/// formulas, the child offsets and the connector anchors all follow it.
#[instrument(level = "trace", skip_all, fields(id = %measured.node.id, depth = depth))]
pub fn layout(
    measured: &MeasuredNode,
    offset: f64,
    depth: usize,
    flow: Flow,
    config: &LayoutConfig,
) -> PositionedTreeNode {
    let level = depth as f64;
    let (x, y) = match flow {
        Flow::Vertical => (
            level * (config.node_width + config.space_x) + config.space_x / 2.0,
            offset + measured.height / 2.0 - config.node_height / 2.0 + config.space_y,
        ),
        Flow::Horizontal => (
            offset + measured.width / 2.0 - config.node_width / 2.0 + config.space_x,
            level * (config.node_height + config.space_y) + config.space_y / 2.0,
        ),
    };
    let bound = Bound::new(x, y, config.node_width, config.node_height);

    let mut children = Vec::with_capacity(measured.children.len());
    let mut connections = Vec::with_capacity(measured.children.len());
    let mut child_offset = offset;

    for child in &measured.children {
        let placed = layout(child, child_offset, depth + 1, flow, config);
        let line = match flow {
            Flow::Vertical => {
                child_offset += child.height + config.space_y;
                Line {
                    x1: bound.right(),
                    y1: bound.y + bound.height / 2.0,
                    x2: placed.bound.x,
                    y2: placed.bound.y + placed.bound.height / 2.0,
                }
            }
            Flow::Horizontal => {
                child_offset += child.width + config.space_x;
                // child x is shifted by the parent's half width, not its own
                Line {
                    x1: bound.x + bound.width / 2.0,
                    y1: bound.bottom(),
                    x2: placed.bound.x + bound.width / 2.0,
                    y2: placed.bound.y,
                }
            }
        };
        children.push(placed);
        connections.push(line);
    }

    PositionedTreeNode {
        node: measured.node.clone(),
        depth,
        bound,
        children,
        connections,
    }
}

/// Canvas needed to render the tree rooted at `root`.
///
/// The vertical width uses `space_y` next to `node_width`; downstream
/// consumers size their surfaces from this exact value.
pub fn canvas_bound(
    root: &TreeNode,
    measured: &MeasuredNode,
    flow: Flow,
    config: &LayoutConfig,
) -> Bound {
    let depth = tree_depth(root) as f64;
    match flow {
        Flow::Vertical => Bound::new(
            0.0,
            0.0,
            depth * (config.space_y + config.node_width) + config.space_x,
            measured.height + 2.0 * config.space_y,
        ),
        Flow::Horizontal => Bound::new(
            0.0,
            0.0,
            measured.width + 2.0 * config.space_x,
            depth * (config.space_y + config.node_height) + config.space_y,
        ),
    }
}
