//! Tests for the memoizing layout controller

use std::rc::Rc;

use rstest::{fixture, rstest};

use treelayout::application::LayoutController;
use treelayout::domain::{
    Bound, DomainError, Flow, Identifier, LayoutConfig, Orientation, TreeBuilder, TreeNode,
    TreeNodeRef,
};

#[fixture]
fn tree() -> TreeNodeRef {
    TreeBuilder::new(1, "Root")
        .leaf(2, "A")
        .child(TreeBuilder::new(3, "B").leaf(4, "C"))
        .build()
}

#[fixture]
fn controller(tree: TreeNodeRef) -> LayoutController {
    LayoutController::new().with_root(tree)
}

#[test]
fn given_new_controller_when_reading_then_defaults_and_no_outputs() {
    let controller = LayoutController::new();

    assert!(controller.root().is_none());
    assert_eq!(controller.orientation(), Orientation::Horizontal);
    assert_eq!(controller.flow(), Flow::Horizontal);
    assert_eq!(controller.node_width(), 120.0);
    assert_eq!(controller.node_height(), 60.0);
    assert_eq!(controller.space_x(), 20.0);
    assert_eq!(controller.space_y(), 80.0);
    assert!(controller.measured_root().is_none());
    assert!(controller.positioned_root().is_none());
    assert!(controller.canvas_bound().is_none());
}

#[rstest]
fn given_unchanged_inputs_when_reading_twice_then_returns_cached_values(controller: LayoutController) {
    let m1 = controller.measured_root().unwrap();
    let p1 = controller.positioned_root().unwrap();
    let b1 = controller.canvas_bound().unwrap();

    let m2 = controller.measured_root().unwrap();
    let p2 = controller.positioned_root().unwrap();
    let b2 = controller.canvas_bound().unwrap();

    assert!(Rc::ptr_eq(&m1, &m2));
    assert!(Rc::ptr_eq(&p1, &p2));
    assert_eq!(b1, b2);
}

#[rstest]
#[case::node_width(|c: &mut LayoutController| c.set_node_width(100.0))]
#[case::node_height(|c: &mut LayoutController| c.set_node_height(40.0))]
#[case::space_x(|c: &mut LayoutController| c.set_space_x(10.0))]
#[case::space_y(|c: &mut LayoutController| c.set_space_y(30.0))]
#[case::orientation(|c: &mut LayoutController| c.set_orientation(Orientation::Vertical).unwrap())]
#[case::config(|c: &mut LayoutController| c.set_config(LayoutConfig { node_width: 50.0, ..LayoutConfig::default() }))]
fn given_changed_input_when_reading_then_recomputes(
    mut controller: LayoutController,
    #[case] change: fn(&mut LayoutController),
) {
    let m1 = controller.measured_root().unwrap();
    let p1 = controller.positioned_root().unwrap();
    let b1 = controller.canvas_bound().unwrap();

    change(&mut controller);

    let m2 = controller.measured_root().unwrap();
    let p2 = controller.positioned_root().unwrap();
    let b2 = controller.canvas_bound().unwrap();

    assert!(!Rc::ptr_eq(&m1, &m2));
    assert!(!Rc::ptr_eq(&p1, &p2));
    assert_ne!(b1, b2);
}

#[rstest]
fn given_same_value_set_again_when_reading_then_cache_survives(mut controller: LayoutController) {
    let p1 = controller.positioned_root().unwrap();

    controller.set_space_x(controller.space_x());
    controller.set_orientation(Orientation::Horizontal).unwrap();

    let p2 = controller.positioned_root().unwrap();
    assert!(Rc::ptr_eq(&p1, &p2));
}

#[rstest]
fn given_structurally_equal_new_root_when_set_then_recomputes(mut controller: LayoutController, tree: TreeNodeRef) {
    let p1 = controller.positioned_root().unwrap();

    // same content, different allocation
    let copy = Rc::new(TreeNode::clone(&tree));
    controller.set_root(Some(copy));

    let p2 = controller.positioned_root().unwrap();
    assert!(!Rc::ptr_eq(&p1, &p2));
    assert_eq!(p1.bound, p2.bound);
}

#[rstest]
fn given_root_cleared_when_reading_then_outputs_absent(mut controller: LayoutController) {
    assert!(controller.positioned_root().is_some());

    controller.set_root(None);

    assert!(controller.measured_root().is_none());
    assert!(controller.positioned_root().is_none());
    assert!(controller.canvas_bound().is_none());
}

#[rstest]
fn given_radial_orientation_when_set_then_rejected_and_previous_kept(mut controller: LayoutController) {
    controller.set_orientation(Orientation::Vertical).unwrap();
    let before = controller.positioned_root().unwrap();

    let result = controller.set_orientation(Orientation::Radial);

    assert_eq!(
        result,
        Err(DomainError::UnsupportedOrientation(Orientation::Radial))
    );
    assert_eq!(controller.orientation(), Orientation::Vertical);
    assert!(Rc::ptr_eq(&before, &controller.positioned_root().unwrap()));
}

#[test]
fn given_radial_orientation_when_constructing_then_rejected() {
    let result = LayoutController::from_config(LayoutConfig::default(), Orientation::Radial);
    assert!(matches!(
        result,
        Err(DomainError::UnsupportedOrientation(Orientation::Radial))
    ));
}

#[rstest]
fn given_orientation_change_when_reading_then_positions_use_new_flow(mut controller: LayoutController) {
    let horizontal = controller.positioned_root().unwrap();

    controller.set_orientation(Orientation::Vertical).unwrap();
    let vertical = controller.positioned_root().unwrap();

    // vertical root sits in the first column
    assert_eq!(vertical.bound.x, controller.space_x() / 2.0);
    assert_ne!(horizontal.bound, vertical.bound);
    assert_eq!(
        vertical.connections[0].x1,
        vertical.bound.x + vertical.bound.width
    );
}

#[rstest]
fn given_insert_when_applied_then_new_root_shares_untouched_subtrees(tree: TreeNodeRef) {
    let mut controller = LayoutController::new().with_root(tree.clone());
    let p1 = controller.positioned_root().unwrap();

    let updated = controller
        .insert_child(&Identifier::Int(3), TreeNode::new(5, "D"))
        .unwrap();

    assert!(!Rc::ptr_eq(&updated, &tree));
    assert!(Rc::ptr_eq(controller.root().unwrap(), &updated));
    // subtree "A" is untouched and shared
    assert!(Rc::ptr_eq(&updated.children()[0], &tree.children()[0]));
    // input tree unchanged
    assert_eq!(tree.children()[1].children().len(), 1);

    let b = &updated.children()[1];
    assert_eq!(b.children().len(), 2);
    assert_eq!(b.children()[1].parent, Some(Identifier::Int(3)));

    let p2 = controller.positioned_root().unwrap();
    assert!(!Rc::ptr_eq(&p1, &p2));
    assert_eq!(p2.node_count(), 5);
}

#[rstest]
fn given_unknown_parent_when_inserting_then_error_and_root_unchanged(tree: TreeNodeRef) {
    let mut controller = LayoutController::new().with_root(tree.clone());
    let result = controller.insert_child(&Identifier::Int(99), TreeNode::new(5, "D"));

    assert_eq!(result, Err(DomainError::ParentNotFound(Identifier::Int(99))));
    assert!(Rc::ptr_eq(controller.root().unwrap(), &tree));
}

#[rstest]
fn given_duplicate_id_when_inserting_then_rejected(mut controller: LayoutController) {
    let result = controller.insert_child(&Identifier::Int(1), TreeNode::new(4, "again"));
    assert_eq!(result, Err(DomainError::DuplicateId(Identifier::Int(4))));
}

#[test]
fn given_zero_spacing_when_reading_then_layout_still_computed() {
    let mut controller = LayoutController::new().with_root(
        TreeBuilder::new(1, "Root").leaf(2, "A").leaf(3, "B").build(),
    );
    controller.set_space_x(0.0);
    controller.set_space_y(0.0);

    let placed = controller.positioned_root().unwrap();

    assert_eq!(placed.children[1].bound.x, 120.0);
    assert_eq!(controller.canvas_bound().unwrap(), Bound::new(0.0, 0.0, 240.0, 120.0));
}
