//! Tidy layout of n-ary trees.
//!
//! Trees are measured bottom-up, then placed top-down into fixed-size boxes
//! with connector lines between parent and child. [`application::LayoutController`]
//! memoizes both passes and recomputes only what an input change invalidates.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
