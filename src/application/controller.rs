//! Stateful layout controller with memoized derivations
//!
//! Holds the current tree and configuration. Derived values (measured tree,
//! positioned tree, canvas bound) are computed on read and cached together
//! with the inputs they were computed from; a read with unchanged inputs
//! returns the cached `Rc`.
//!
//! The root is compared by pointer identity. Trees are immutable behind
//! [`TreeNodeRef`], so an edit always produces a new root and invalidates the
//! cache (see [`LayoutController::insert_child`]).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::domain::{
    self, canvas_bound, layout, measure, Bound, DomainError, DomainResult, Flow, Identifier,
    LayoutConfig, MeasuredNode, Orientation, PositionedTreeNode, TreeNode, TreeNodeRef,
};

/// Last computed value and the key it was computed for.
#[derive(Debug)]
struct Memo<K, V> {
    slot: RefCell<Option<(K, V)>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    fn get_or_update(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached_key, value)) = self.slot.borrow().as_ref() {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute();
        *self.slot.borrow_mut() = Some((key, value.clone()));
        value
    }
}

/// Bit patterns of the numeric settings, so NaN compares equal to itself.
fn config_bits(config: &LayoutConfig) -> [u64; 4] {
    [
        config.node_width.to_bits(),
        config.node_height.to_bits(),
        config.space_x.to_bits(),
        config.space_y.to_bits(),
    ]
}

fn same_rc<T>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[derive(Debug)]
struct MeasureKey {
    root: Option<TreeNodeRef>,
    flow: Flow,
    config: [u64; 4],
}

impl PartialEq for MeasureKey {
    fn eq(&self, other: &Self) -> bool {
        same_rc(&self.root, &other.root) && self.flow == other.flow && self.config == other.config
    }
}

#[derive(Debug)]
struct PlaceKey {
    measured: Option<Rc<MeasuredNode>>,
}

impl PartialEq for PlaceKey {
    fn eq(&self, other: &Self) -> bool {
        same_rc(&self.measured, &other.measured)
    }
}

#[derive(Debug)]
struct BoundKey {
    measured: Option<Rc<MeasuredNode>>,
    root: Option<TreeNodeRef>,
    flow: Flow,
    config: [u64; 4],
}

impl PartialEq for BoundKey {
    fn eq(&self, other: &Self) -> bool {
        same_rc(&self.measured, &other.measured)
            && same_rc(&self.root, &other.root)
            && self.flow == other.flow
            && self.config == other.config
    }
}

/// Owns layout inputs and re-derives outputs when they change.
///
/// Single-threaded: caches live in `RefCell`s, so the controller is not `Sync`.
#[derive(Debug, Default)]
pub struct LayoutController {
    root: Option<TreeNodeRef>,
    flow: Flow,
    config: LayoutConfig,
    measured: Memo<MeasureKey, Option<Rc<MeasuredNode>>>,
    positioned: Memo<PlaceKey, Option<Rc<PositionedTreeNode>>>,
    bound: Memo<BoundKey, Option<Bound>>,
}

impl LayoutController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller with explicit settings; fails for orientations without a placement algorithm.
    pub fn from_config(config: LayoutConfig, orientation: Orientation) -> DomainResult<Self> {
        Ok(Self {
            flow: Flow::try_from(orientation)?,
            config,
            ..Self::default()
        })
    }

    pub fn with_root(mut self, root: TreeNodeRef) -> Self {
        self.root = Some(root);
        self
    }

    // state

    pub fn root(&self) -> Option<&TreeNodeRef> {
        self.root.as_ref()
    }

    pub fn orientation(&self) -> Orientation {
        self.flow.into()
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    pub fn node_width(&self) -> f64 {
        self.config.node_width
    }

    pub fn node_height(&self) -> f64 {
        self.config.node_height
    }

    pub fn space_x(&self) -> f64 {
        self.config.space_x
    }

    pub fn space_y(&self) -> f64 {
        self.config.space_y
    }

    // setters: numeric values are taken as given

    pub fn set_root(&mut self, root: Option<TreeNodeRef>) {
        self.root = root;
    }

    /// Rejects `Radial`, keeping the current orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) -> DomainResult<()> {
        self.flow = Flow::try_from(orientation)?;
        debug!("orientation set to {}", orientation);
        Ok(())
    }

    pub fn set_node_width(&mut self, node_width: f64) {
        self.config.node_width = node_width;
    }

    pub fn set_node_height(&mut self, node_height: f64) {
        self.config.node_height = node_height;
    }

    pub fn set_space_x(&mut self, space_x: f64) {
        self.config.space_x = space_x;
    }

    pub fn set_space_y(&mut self, space_y: f64) {
        self.config.space_y = space_y;
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Appends `child` under `parent_id` and replaces the root with the edited copy.
    pub fn insert_child(&mut self, parent_id: &Identifier, child: TreeNode) -> DomainResult<TreeNodeRef> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| DomainError::ParentNotFound(parent_id.clone()))?;
        let updated = domain::insert_child(root, parent_id, child)?;
        self.root = Some(updated.clone());
        Ok(updated)
    }

    // derived values

    #[instrument(level = "trace", skip(self))]
    pub fn measured_root(&self) -> Option<Rc<MeasuredNode>> {
        let key = MeasureKey {
            root: self.root.clone(),
            flow: self.flow,
            config: config_bits(&self.config),
        };
        self.measured.get_or_update(key, || {
            trace!("measuring tree");
            self.root.as_ref().map(|root| Rc::new(measure(root, &self.config)))
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn positioned_root(&self) -> Option<Rc<PositionedTreeNode>> {
        let measured = self.measured_root();
        let key = PlaceKey {
            measured: measured.clone(),
        };
        self.positioned.get_or_update(key, || {
            trace!("placing tree");
            measured.map(|m| Rc::new(layout(&m, 0.0, 0, self.flow, &self.config)))
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn canvas_bound(&self) -> Option<Bound> {
        let measured = self.measured_root();
        let key = BoundKey {
            measured: measured.clone(),
            root: self.root.clone(),
            flow: self.flow,
            config: config_bits(&self.config),
        };
        self.bound.get_or_update(key, || match (self.root.as_ref(), measured) {
            (Some(root), Some(m)) => Some(canvas_bound(root, &m, self.flow, &self.config)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;

    #[test]
    fn given_no_root_when_reading_derived_values_then_all_absent() {
        let controller = LayoutController::new();
        assert!(controller.measured_root().is_none());
        assert!(controller.positioned_root().is_none());
        assert!(controller.canvas_bound().is_none());
    }

    #[test]
    fn given_nan_spacing_when_reading_twice_then_cache_hits() {
        let root = TreeBuilder::new(1, "Root").leaf(2, "A").build();
        let mut controller = LayoutController::new().with_root(root);
        controller.set_space_x(f64::NAN);

        let first = controller.measured_root().unwrap();
        let second = controller.measured_root().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn given_radial_when_creating_from_config_then_rejected() {
        let result = LayoutController::from_config(LayoutConfig::default(), Orientation::Radial);
        assert!(matches!(
            result,
            Err(DomainError::UnsupportedOrientation(Orientation::Radial))
        ));
    }
}
