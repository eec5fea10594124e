//! Path-tracking Depth-first Traversal
//!
//! Non-recursive DFS over [`Graph`] out-edges. The frame stack doubles as the
//! current path, so a cycle is materialized by copying the stack.
//!
//! Iteration yields the start node first, then every newly visited node in
//! depth-first pre-order. Between steps, [`DepthFirst::peek_next`] exposes
//! the out-edge the top frame would examine next without consuming it.

use rustc_hash::FxHashSet;

use super::graph::{EdgeId, Graph, NodeId};

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    /// Index into the node's out-edge list
    cursor: usize,
}

/// Depth-first walker borrowing a graph
#[derive(Debug)]
pub struct DepthFirst<'g> {
    graph: &'g Graph,
    stack: Vec<Frame>,
    visited: FxHashSet<NodeId>,
    started: bool,
}

impl<'g> DepthFirst<'g> {
    /// Start a traversal at `start`, which must be a live node
    pub fn new(graph: &'g Graph, start: NodeId) -> Self {
        assert!(
            graph.contains_node(start),
            "attempt to traverse from a removed node {start}"
        );
        let mut visited = FxHashSet::default();
        visited.insert(start);
        Self {
            graph,
            stack: vec![Frame {
                node: start,
                cursor: 0,
            }],
            visited,
            started: false,
        }
    }

    /// Node at the top of the stack, `None` once the traversal is exhausted
    #[inline]
    pub fn current(&self) -> Option<NodeId> {
        self.stack.last().map(|frame| frame.node)
    }

    /// Out-edge at the top frame's cursor
    pub fn peek_next(&self) -> Option<EdgeId> {
        let frame = self.stack.last()?;
        self.graph.out_edges(frame.node).get(frame.cursor).copied()
    }

    /// Nodes from the start node to the current node
    pub fn path(&self) -> Vec<NodeId> {
        self.stack.iter().map(|frame| frame.node).collect()
    }

    /// Check if `n` has been visited so far
    #[inline]
    pub fn visited(&self, n: NodeId) -> bool {
        self.visited.contains(&n)
    }

    fn advance(&mut self) {
        let graph = self.graph;
        while let Some(top) = self.stack.last_mut() {
            let out_edges = graph.out_edges(top.node);
            while let Some(&edge) = out_edges.get(top.cursor) {
                top.cursor += 1;
                let next = graph.edge_target(edge);
                if self.visited.insert(next) {
                    self.stack.push(Frame {
                        node: next,
                        cursor: 0,
                    });
                    return;
                }
            }
            self.stack.pop();
        }
    }
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.started {
            self.advance();
        } else {
            self.started = true;
        }
        self.current()
    }
}
