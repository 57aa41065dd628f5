//! Layout service
//!
//! Loads tree files, wires settings into a [`LayoutController`] and produces
//! exportable layout snapshots.

use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, LayoutController};
use crate::config::LayoutSettings;
use crate::domain::{
    validate_tree, Bound, Identifier, LayoutConfig, Orientation, PositionedTreeNode, TreeNode,
    TreeNodeRef,
};
use crate::infrastructure::traits::FileSystem;

/// Serialization format of a tree file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Toml,
}

impl TreeFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(TreeFormat::Json),
            "toml" => Some(TreeFormat::Toml),
            _ => None,
        }
    }
}

/// Snapshot of a computed layout, as handed to renderers and exporters.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub orientation: Orientation,
    pub config: LayoutConfig,
    /// Canvas needed to draw the whole tree
    pub bound: Bound,
    pub root: Rc<PositionedTreeNode>,
}

/// Service for loading trees and computing their layout.
pub struct LayoutService {
    fs: Arc<dyn FileSystem>,
}

impl LayoutService {
    /// Create a new layout service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read, parse and validate a tree file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<TreeNodeRef> {
        let format = TreeFormat::from_path(path)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))?;
        if !self.fs.exists(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("tree file not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree file", path)?;
        let root = Self::parse_tree(&content, format, path)?;
        validate_tree(&root)?;
        debug!("load_tree: root={} ({:?})", root.id, format);
        Ok(root)
    }

    /// Parse tree content; `path` is only used in error messages.
    pub fn parse_tree(content: &str, format: TreeFormat, path: &Path) -> ApplicationResult<TreeNodeRef> {
        let parsed: Result<TreeNode, String> = match format {
            TreeFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            TreeFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed
            .map(TreeNode::into_ref)
            .map_err(|message| ApplicationError::Parse {
                path: path.to_path_buf(),
                message,
            })
    }

    /// Controller for `root` configured from settings.
    ///
    /// Fails when the configured orientation has no placement algorithm.
    pub fn controller(&self, root: TreeNodeRef, settings: &LayoutSettings) -> ApplicationResult<LayoutController> {
        let controller = LayoutController::from_config(settings.to_config(), settings.orientation)?;
        Ok(controller.with_root(root))
    }

    /// Append a new node named `name` under `parent`, with a generated id.
    pub fn insert_node(
        &self,
        controller: &mut LayoutController,
        parent: &Identifier,
        name: &str,
    ) -> ApplicationResult<TreeNodeRef> {
        let node = TreeNode::new(Uuid::new_v4().to_string(), name);
        debug!("insert_node: {} under {}", node.id, parent);
        Ok(controller.insert_child(parent, node)?)
    }

    /// Current layout of the controller, `None` without a root.
    pub fn report(controller: &LayoutController) -> Option<LayoutReport> {
        Some(LayoutReport {
            orientation: controller.orientation(),
            config: controller.config(),
            bound: controller.canvas_bound()?,
            root: controller.positioned_root()?,
        })
    }
}
