//! Depth-first traversal orders.
//!
//! Both functions return collected vectors since the order requires a full
//! traversal anyway. Only nodes reachable from the start node appear.

use crate::utils::graph::{NodeId, Successors};

/// Computes the postorder traversal of nodes reachable from the start.
///
/// In postorder, a node is emitted after all of its descendants in the
/// depth-first spanning tree. Successors are explored in the order the graph
/// yields them. An out-of-range start node yields an empty vector.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
#[allow(clippy::items_after_statements)]
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let node_count = graph.node_count();
    if start.index() >= node_count {
        return Vec::new();
    }

    let mut visited = vec![false; node_count];
    let mut result = Vec::with_capacity(node_count);

    #[derive(Clone, Copy)]
    enum State {
        Enter,
        Exit,
    }

    let mut stack = vec![(start, State::Enter)];

    while let Some((node, state)) = stack.pop() {
        match state {
            State::Enter => {
                if visited[node.index()] {
                    continue;
                }
                visited[node.index()] = true;
                stack.push((node, State::Exit));

                // Reverse so the first successor is explored first
                let successors: Vec<NodeId> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if succ.index() < node_count && !visited[succ.index()] {
                        stack.push((succ, State::Enter));
                    }
                }
            }
            State::Exit => result.push(node),
        }
    }

    result
}

/// Computes the reverse postorder traversal of nodes reachable from the start.
///
/// In reverse postorder every node comes before its successors, ignoring back
/// edges. Forward data flow problems such as dominance converge fastest when
/// iterated in this order.
///
/// # Examples
///
/// ```rust
/// use ssagraph::ir::Function;
/// use ssagraph::utils::graph::{algorithms::reverse_postorder, NodeId};
///
/// let mut func = Function::new("f");
/// let a = func.create_block("a");
/// let b = func.create_block("b");
/// let c = func.create_block("c");
/// func.link_successor(a, b).unwrap();
/// func.link_successor(b, c).unwrap();
///
/// let order = reverse_postorder(&func, a.into());
/// assert_eq!(order, vec![NodeId::from(a), NodeId::from(b), NodeId::from(c)]);
/// ```
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut result = postorder(graph, start);
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::traits::tests::TestGraph;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().map(|&n| NodeId::new(n)).collect()
    }

    #[test]
    fn test_postorder_linear() {
        let graph = TestGraph::new(3, &[(0, 1), (1, 2)]);
        assert_eq!(postorder(&graph, NodeId::new(0)), ids(&[2, 1, 0]));
    }

    #[test]
    fn test_postorder_diamond() {
        let graph = TestGraph::new(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let order = postorder(&graph, NodeId::new(0));

        assert_eq!(order.len(), 4);
        assert_eq!(order[0], NodeId::new(3));
        assert_eq!(order[3], NodeId::new(0));
    }

    #[test]
    fn test_reverse_postorder_with_cycle() {
        // 0 -> 1 -> 2 -> 1, 2 -> 3
        let graph = TestGraph::new(4, &[(0, 1), (1, 2), (2, 1), (2, 3)]);
        assert_eq!(reverse_postorder(&graph, NodeId::new(0)), ids(&[0, 1, 2, 3]));
    }

    #[test]
    fn test_traversal_skips_unreachable() {
        let graph = TestGraph::new(3, &[(0, 1), (2, 1)]);
        assert_eq!(reverse_postorder(&graph, NodeId::new(0)), ids(&[0, 1]));
    }

    #[test]
    fn test_self_loop() {
        let graph = TestGraph::new(2, &[(0, 0), (0, 1)]);
        assert_eq!(postorder(&graph, NodeId::new(0)), ids(&[1, 0]));
    }

    #[test]
    fn test_invalid_start() {
        let graph = TestGraph::new(2, &[(0, 1)]);
        assert!(postorder(&graph, NodeId::new(5)).is_empty());
    }
}
