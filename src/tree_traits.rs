/*
Rendering helpers for the CLI: layout trees as `termtree` trees.

Implemented as a trait so the domain types stay free of presentation code.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{MeasuredNode, PositionedTreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for PositionedTreeNode {
    #[instrument(level = "trace", skip(self), fields(id = %self.node.id))]
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!("{} [{}] {}", self.node.name, self.node.id, self.bound);

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeNodeConvert for MeasuredNode {
    #[instrument(level = "trace", skip(self), fields(id = %self.node.id))]
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!(
            "{} [{}] {}x{}",
            self.node.name, self.node.id, self.width, self.height
        );

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}
