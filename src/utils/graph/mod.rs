//! Graph abstractions for control flow analysis.
//!
//! Algorithms are written against small traits instead of a concrete graph
//! type. A [`crate::ir::Function`] implements them over its live blocks, with
//! each block handle mapping one-to-one onto a [`NodeId`].
//!
//! # Traits
//!
//! - [`GraphBase`] - node count and node iteration
//! - [`Successors`] - forward edges
//! - [`Predecessors`] - backward edges
//! - [`RootedGraph`] - a designated entry node
//!
//! # Algorithms
//!
//! See [`algorithms`] for traversal orders and dominator computation.

pub mod algorithms;
mod node;
mod traits;

pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
