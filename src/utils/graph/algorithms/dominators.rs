//! Dominator computation by iterative data flow.
//!
//! A node `d` **dominates** a node `n` if every path from the entry node to `n`
//! passes through `d`. Every node dominates itself. The **immediate dominator**
//! of `n` is the strict dominator of `n` that does not dominate any other
//! strict dominator of `n`; making it the parent of `n` forms the dominator
//! tree rooted at the entry.
//!
//! # Algorithm
//!
//! The classic set-based fixpoint:
//!
//! ```text
//! Dom(entry) = { entry }
//! Dom(n)     = all nodes                         for n != entry
//! repeat until no set changes:
//!     Dom(n) = { n } ∪ ⋂ { Dom(p) | p ∈ preds(n) }
//! ```
//!
//! Nodes are visited in reverse postorder and only reachable nodes take part,
//! so predecessors that cannot be reached from the entry never shrink a set.
//! Unreachable nodes have no dominator set at all; callers decide how to
//! report them.
//!
//! Sets are [`BitSet`]s indexed by node, which keeps the intersection step to a
//! few word operations for the block counts seen in practice.

use crate::utils::{
    graph::{
        algorithms::traversal::reverse_postorder, NodeId, Predecessors, RootedGraph,
    },
    BitSet,
};

/// Full dominator sets of every node reachable from the entry.
///
/// This is the direct result of the fixpoint. Use [`DominatorTree`] when only
/// parent, depth or ancestor queries are needed.
#[derive(Debug, Clone)]
pub struct DominatorSets {
    /// The entry node the sets were computed from
    entry: NodeId,
    /// Dominator set per node index, `None` for unreachable or unknown nodes
    sets: Vec<Option<BitSet>>,
}

impl DominatorSets {
    /// Returns the entry node the sets were computed from.
    #[must_use]
    #[inline]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the number of node slots covered by these sets.
    #[must_use]
    #[inline]
    pub fn node_count(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if `node` is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        matches!(self.sets.get(node.index()), Some(Some(_)))
    }

    /// Returns the dominator set of `node`, self included, or `None` if the
    /// node is unreachable.
    #[must_use]
    pub fn dominators(&self, node: NodeId) -> Option<&BitSet> {
        self.sets.get(node.index())?.as_ref()
    }

    /// Returns `true` if `a` dominates `b`. Always `false` when `b` is unreachable.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.dominators(b).is_some_and(|set| set.contains(a.index()))
    }

    /// Returns the strict dominators of `node` that dominate no other strict
    /// dominator of `node`.
    ///
    /// Dominators of a node form a chain, so the result is empty for the entry
    /// and for unreachable nodes, and holds exactly one node otherwise.
    #[must_use]
    pub fn immediate_dominators(&self, node: NodeId) -> Vec<NodeId> {
        let Some(set) = self.dominators(node) else {
            return Vec::new();
        };

        let strict: Vec<usize> = set.iter().filter(|&d| d != node.index()).collect();
        strict
            .iter()
            .copied()
            .filter(|&d| {
                !strict.iter().any(|&other| {
                    other != d && self.dominates(NodeId::new(d), NodeId::new(other))
                })
            })
            .map(NodeId::new)
            .collect()
    }

    /// Returns the immediate dominator of `node`, or `None` for the entry and
    /// unreachable nodes.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        self.immediate_dominators(node).first().copied()
    }
}

/// Dominator tree built from immediate dominators.
///
/// Each reachable node except the entry has exactly one parent. Unreachable
/// nodes are not part of the tree; every query treats them as absent.
#[derive(Debug, Clone)]
pub struct DominatorTree {
    /// The entry (root) node of the dominator tree
    entry: NodeId,
    /// Immediate dominator for each node, `None` for the entry and unreachable nodes
    idom: Vec<Option<NodeId>>,
    /// Nodes reachable from the entry
    reachable: BitSet,
}

impl DominatorTree {
    /// Builds the tree from precomputed dominator sets.
    #[must_use]
    pub fn from_sets(sets: &DominatorSets) -> Self {
        let node_count = sets.node_count();
        let mut reachable = BitSet::new(node_count);
        let mut idom = vec![None; node_count];

        for (index, slot) in idom.iter_mut().enumerate() {
            let node = NodeId::new(index);
            if sets.is_reachable(node) {
                reachable.insert(index);
                *slot = sets.immediate_dominator(node);
            }
        }

        DominatorTree {
            entry: sets.entry(),
            idom,
            reachable,
        }
    }

    /// Returns the entry (root) node of the dominator tree.
    #[must_use]
    #[inline]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the number of node slots in the tree.
    #[must_use]
    #[inline]
    pub fn node_count(&self) -> usize {
        self.idom.len()
    }

    /// Returns `true` if `node` is part of the tree.
    #[must_use]
    #[inline]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.reachable.contains(node.index())
    }

    /// Returns the immediate dominator of a node, or `None` for the entry node
    /// and nodes outside the tree.
    #[must_use]
    #[inline]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        self.idom.get(node.index()).copied().flatten()
    }

    /// Checks if node `a` dominates node `b`.
    ///
    /// A reachable node dominates itself. Nodes outside the tree neither
    /// dominate nor are dominated.
    ///
    /// # Complexity
    ///
    /// O(depth) where depth is the depth of `b` in the dominator tree.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.is_reachable(b) && self.dominators(b).any(|d| d == a)
    }

    /// Checks if node `a` strictly dominates node `b`.
    #[must_use]
    #[inline]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns an iterator over all dominators of a node, from the node itself
    /// up to (and including) the entry node. Empty for nodes outside the tree.
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: self.is_reachable(node).then_some(node),
        }
    }

    /// Returns the depth of a node in the dominator tree, 0 for the entry.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        self.is_reachable(node)
            .then(|| self.dominators(node).count().saturating_sub(1))
    }

    /// Returns the children of a node in the dominator tree, in index order.
    ///
    /// # Complexity
    ///
    /// O(V) where V is the number of nodes.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.idom
            .iter()
            .enumerate()
            .filter(|(_, parent)| **parent == Some(node))
            .map(|(index, _)| NodeId::new(index))
            .collect()
    }
}

/// Iterator over dominators of a node, from the node up to the entry.
pub struct DominatorIterator<'a> {
    tree: &'a DominatorTree,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.immediate_dominator(current);
        Some(current)
    }
}

/// Computes the dominator set of every node reachable from the graph's entry.
///
/// # Complexity
///
/// Each pass costs O(E · V / 64). In reverse postorder the number of passes is
/// bounded by the loop nesting depth plus two.
///
/// # Examples
///
/// ```rust
/// use ssagraph::ir::Function;
/// use ssagraph::utils::graph::algorithms::compute_dominator_sets;
///
/// let mut func = Function::new("f");
/// let entry = func.create_block("entry");
/// let body = func.create_block("body");
/// func.link_successor(entry, body).unwrap();
///
/// let cfg = func.cfg().unwrap();
/// let sets = compute_dominator_sets(&cfg);
/// assert!(sets.dominates(entry.into(), body.into()));
/// assert!(!sets.dominates(body.into(), entry.into()));
/// ```
pub fn compute_dominator_sets<G: RootedGraph + Predecessors>(graph: &G) -> DominatorSets {
    let node_count = graph.node_count();
    let entry = graph.entry();
    let mut sets: Vec<Option<BitSet>> = vec![None; node_count];

    let order = reverse_postorder(graph, entry);
    if order.is_empty() {
        return DominatorSets { entry, sets };
    }

    let mut reachable = BitSet::new(node_count);
    for node in &order {
        reachable.insert(node.index());
    }

    for node in &order {
        sets[node.index()] = Some(reachable.clone());
    }
    let mut entry_set = BitSet::new(node_count);
    entry_set.insert(entry.index());
    sets[entry.index()] = Some(entry_set);

    let mut changed = true;
    while changed {
        changed = false;

        // order[0] is the entry, whose set is fixed
        for &node in order.iter().skip(1) {
            let mut next = reachable.clone();
            for pred in graph.predecessors(node) {
                if let Some(Some(pred_set)) = sets.get(pred.index()) {
                    next.intersect_with(pred_set);
                }
            }
            next.insert(node.index());

            if sets[node.index()].as_ref() != Some(&next) {
                sets[node.index()] = Some(next);
                changed = true;
            }
        }
    }

    DominatorSets { entry, sets }
}

/// Computes the dominator tree of a rooted graph.
///
/// Runs [`compute_dominator_sets`] and keeps only the immediate dominators.
pub fn compute_dominators<G: RootedGraph + Predecessors>(graph: &G) -> DominatorTree {
    DominatorTree::from_sets(&compute_dominator_sets(graph))
}
