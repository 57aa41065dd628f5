//! Domain layer: tree model and the layout engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod measure;
pub mod place;

pub use builder::{find_node, insert_child, validate_tree, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use measure::{measure, tree_depth};
pub use place::{canvas_bound, layout};
