//! Supporting data structures and graph algorithms.
//!
//! - [`BitSet`] - packed set of small integers used for dominator sets
//! - [`graph`] - graph abstraction traits and the algorithms that run on them
//!
//! The control flow graph of a [`crate::ir::Function`] implements the traits in
//! [`graph`], so the algorithms here never see IR types directly.

mod bitset;
pub mod graph;

pub use bitset::{BitSet, BitSetIter};
