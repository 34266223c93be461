//! Trait definitions for graph abstractions.
//!
//! The trait hierarchy is minimal and composable:
//!
//! - [`GraphBase`] - Core properties: node count and node iteration
//! - [`Successors`] - Forward edge traversal (outgoing edges)
//! - [`Predecessors`] - Backward edge traversal (incoming edges)
//! - [`RootedGraph`] - Graphs with a designated entry node (for dominator computation)
//!
//! All adjacency queries return iterators rather than collections, so simple
//! traversals do not allocate.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
///
/// Node identifiers must be dense: every id yielded by
/// [`node_ids`](GraphBase::node_ids) is below [`node_count`](GraphBase::node_count),
/// so algorithms can size per-node tables with `node_count`. Implementations
/// may leave holes (ids below `node_count` that are never yielded), as a
/// function does for removed blocks.
pub trait GraphBase {
    /// Returns the upper bound on node indices in the graph.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all live node identifiers in ascending order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
///
/// # Examples
///
/// ```rust
/// use ssagraph::ir::Function;
/// use ssagraph::utils::graph::{NodeId, Successors};
///
/// let mut func = Function::new("f");
/// let a = func.create_block("a");
/// let b = func.create_block("b");
/// func.link_successor(a, b).unwrap();
///
/// let succs: Vec<NodeId> = func.successors(a.into()).collect();
/// assert_eq!(succs, vec![NodeId::from(b)]);
/// ```
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node.
    ///
    /// For a directed edge `(u, v)`, node `v` is a successor of `u`. Unknown
    /// nodes have no successors.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node.
    ///
    /// For a directed edge `(u, v)`, node `u` is a predecessor of `v`. Unknown
    /// nodes have no predecessors.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs with a designated entry node.
///
/// Dominance is only defined relative to an entry; nodes not reachable from
/// it have no dominators.
pub trait RootedGraph: Successors {
    /// Returns the entry node of the graph.
    fn entry(&self) -> NodeId;
}
