//! Tree construction, validation and copy-on-write edits.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::domain::entities::{Identifier, TreeNode, TreeNodeRef};
use crate::domain::error::{DomainError, DomainResult};

/// Builds trees in code, filling in each child's `parent` id.
///
/// ```
/// use treelayout::domain::TreeBuilder;
///
/// let root = TreeBuilder::new(1, "Root")
///     .leaf(2, "A")
///     .child(TreeBuilder::new(3, "B").leaf(4, "C"))
///     .build();
/// assert_eq!(root.children().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    id: Identifier,
    name: String,
    children: Vec<TreeBuilder>,
}

impl TreeBuilder {
    pub fn new(id: impl Into<Identifier>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: TreeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn leaf(self, id: impl Into<Identifier>, name: impl Into<String>) -> Self {
        self.child(TreeBuilder::new(id, name))
    }

    pub fn build(self) -> TreeNodeRef {
        self.build_with_parent(None)
    }

    fn build_with_parent(self, parent: Option<Identifier>) -> TreeNodeRef {
        let children = if self.children.is_empty() {
            None
        } else {
            let id = self.id.clone();
            Some(
                self.children
                    .into_iter()
                    .map(|c| c.build_with_parent(Some(id.clone())))
                    .collect(),
            )
        };
        Rc::new(TreeNode {
            id: self.id,
            name: self.name,
            children,
            parent,
        })
    }
}

/// Checks that every id occurs once in the tree.
#[instrument(level = "debug", skip_all, fields(root = %root.id))]
pub fn validate_tree(root: &TreeNode) -> DomainResult<()> {
    let mut seen: HashSet<&Identifier> = HashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if !seen.insert(&node.id) {
            return Err(DomainError::DuplicateId(node.id.clone()));
        }
        stack.extend(node.children().iter().map(|c| c.as_ref()));
    }
    debug!("validated {} nodes", seen.len());
    Ok(())
}

/// Looks up a node by id, depth first.
pub fn find_node<'a>(root: &'a TreeNodeRef, id: &Identifier) -> Option<&'a TreeNodeRef> {
    if &root.id == id {
        return Some(root);
    }
    root.children().iter().find_map(|c| find_node(c, id))
}

/// Returns a new root with `child` appended under the node `parent_id`.
///
/// Only the nodes on the path from the root to the parent are copied; every
/// other subtree is shared with `root`, which is left untouched.
#[instrument(level = "debug", skip(root, child), fields(child = %child.id))]
pub fn insert_child(
    root: &TreeNodeRef,
    parent_id: &Identifier,
    child: TreeNode,
) -> DomainResult<TreeNodeRef> {
    if find_node(root, &child.id).is_some() {
        return Err(DomainError::DuplicateId(child.id));
    }
    let child = Rc::new(TreeNode {
        parent: Some(parent_id.clone()),
        ..child
    });
    insert_into(root, parent_id, &child).ok_or_else(|| DomainError::ParentNotFound(parent_id.clone()))
}

fn insert_into(
    node: &TreeNodeRef,
    parent_id: &Identifier,
    child: &TreeNodeRef,
) -> Option<TreeNodeRef> {
    if &node.id == parent_id {
        let mut children = node.children().to_vec();
        children.push(child.clone());
        return Some(Rc::new(TreeNode {
            children: Some(children),
            ..TreeNode::clone(node)
        }));
    }

    node.children().iter().enumerate().find_map(|(i, c)| {
        insert_into(c, parent_id, child).map(|updated| {
            let mut children = node.children().to_vec();
            children[i] = updated;
            Rc::new(TreeNode {
                children: Some(children),
                ..TreeNode::clone(node)
            })
        })
    })
}
