//! Graph algorithms for control flow analysis.
//!
//! ## Traversal
//!
//! - [`postorder`] - Postorder traversal from a start node
//! - [`reverse_postorder`] - Reverse postorder (the iteration order for forward data flow)
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominator_sets`] - Full dominator set of every reachable node
//! - [`compute_dominators`] - Dominator tree built from those sets
//! - [`DominatorTree`] - Immediate dominator, dominance and depth queries
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | Postorder / RPO | O(V + E) | Reachability, iteration order |
//! | Dominator sets | O(V² · d) worst case | Dominance queries on small CFGs |
//!
//! `d` is the loop nesting depth; with reverse postorder iteration the
//! fixpoint converges in `d + 2` passes.

mod dominators;
mod traversal;

pub use dominators::{
    compute_dominator_sets, compute_dominators, DominatorIterator, DominatorSets, DominatorTree,
};
pub use traversal::{postorder, reverse_postorder};
