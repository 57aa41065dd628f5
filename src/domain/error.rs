//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{Identifier, Orientation};

/// Domain errors represent violations of the tree model.
/// Measuring and placing never fail; these come from configuration and edits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("orientation not supported by the layout engine: {0}")]
    UnsupportedOrientation(Orientation),

    #[error("unknown orientation: {0} (expected horizontal, vertical or radial)")]
    UnknownOrientation(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(Identifier),

    #[error("parent node not found: {0}")]
    ParentNotFound(Identifier),
}

pub type DomainResult<T> = Result<T, DomainError>;
