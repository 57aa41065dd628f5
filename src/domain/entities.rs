//! Domain entities: core data structures

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::domain::error::{DomainError, DomainResult};

/// Node identifier, either an integer or a string.
///
/// Deserialized untagged, so `1` and `"a"` are both accepted in tree files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Int(i64),
    Str(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(i) => write!(f, "{}", i),
            Identifier::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Int(i64::from(value))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Str(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Str(value)
    }
}

impl FromStr for Identifier {
    type Err = std::convert::Infallible;

    /// Integers win: `"12"` parses to `Int(12)`, anything else stays a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<i64>()
            .map(Identifier::Int)
            .unwrap_or_else(|_| Identifier::Str(s.to_string())))
    }
}

/// Axis convention of the rendered tree.
///
/// `Radial` is accepted by the type (and by config files) but has no
/// placement algorithm; see [`Flow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Levels advance top to bottom, siblings spread left to right.
    #[default]
    Horizontal,
    /// Levels advance left to right, siblings spread top to bottom.
    Vertical,
    Radial,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
            Orientation::Radial => "radial",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Orientation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "radial" => Ok(Orientation::Radial),
            other => Err(DomainError::UnknownOrientation(other.to_string())),
        }
    }
}

/// An orientation the placer can lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flow {
    #[default]
    Horizontal,
    Vertical,
}

impl TryFrom<Orientation> for Flow {
    type Error = DomainError;

    fn try_from(orientation: Orientation) -> DomainResult<Self> {
        match orientation {
            Orientation::Horizontal => Ok(Flow::Horizontal),
            Orientation::Vertical => Ok(Flow::Vertical),
            Orientation::Radial => Err(DomainError::UnsupportedOrientation(orientation)),
        }
    }
}

impl From<Flow> for Orientation {
    fn from(flow: Flow) -> Self {
        match flow {
            Flow::Horizontal => Orientation::Horizontal,
            Flow::Vertical => Orientation::Vertical,
        }
    }
}

/// Shared, immutable handle to a tree node.
pub type TreeNodeRef = Rc<TreeNode>;

/// Logical input node.
///
/// Trees are immutable once wrapped in [`TreeNodeRef`]; structural edits build
/// a new root (see [`crate::domain::insert_child`]). This also makes cyclic
/// trees unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: Identifier,
    /// Display label
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNodeRef>>,
    /// Id of the parent node, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Identifier>,
}

impl TreeNode {
    pub fn new(id: impl Into<Identifier>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
            parent: None,
        }
    }

    /// Children in order; an absent list reads as empty.
    pub fn children(&self) -> &[TreeNodeRef] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    pub fn into_ref(self) -> TreeNodeRef {
        Rc::new(self)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bound {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bound {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the interiors of both rectangles intersect (touching edges do not count).
    pub fn overlaps(&self, other: &Bound) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Connector segment from a parent anchor to a child anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Node size and spacing shared by the measurer and the placer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between siblings in horizontal flow, level gap in vertical flow
    pub space_x: f64,
    /// Level gap in horizontal flow, gap between siblings in vertical flow
    pub space_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            node_height: 60.0,
            space_x: 20.0,
            space_y: 80.0,
        }
    }
}

/// Subtree footprint computed by [`crate::domain::measure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredNode {
    #[serde(serialize_with = "serialize_node_summary")]
    pub node: TreeNodeRef,
    pub width: f64,
    pub height: f64,
    pub children: Vec<MeasuredNode>,
}

/// Fully placed node, the engine's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedTreeNode {
    #[serde(serialize_with = "serialize_node_summary")]
    pub node: TreeNodeRef,
    /// 0 for the root
    pub depth: usize,
    pub bound: Bound,
    pub children: Vec<PositionedTreeNode>,
    /// One connector per child, same order as `children`
    pub connections: Vec<Line>,
}

impl PositionedTreeNode {
    /// Pre-order, left-to-right traversal of this subtree.
    pub fn iter(&self) -> PositionedIter<'_> {
        PositionedIter { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

pub struct PositionedIter<'a> {
    stack: Vec<&'a PositionedTreeNode>,
}

impl<'a> Iterator for PositionedIter<'a> {
    type Item = &'a PositionedTreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // reverse so the leftmost child is visited first
        for child in current.children.iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}

#[derive(Serialize)]
struct NodeSummary<'a> {
    id: &'a Identifier,
    name: &'a str,
}

fn serialize_node_summary<S: Serializer>(node: &TreeNodeRef, serializer: S) -> Result<S::Ok, S::Error> {
    NodeSummary {
        id: &node.id,
        name: &node.name,
    }
    .serialize(serializer)
}
