//! Constraint Graph
//!
//! Directed graph over small integer handles, tuned for "add a lot, remove a
//! little, iterate adjacency constantly":
//! - Nodes and edges live in vectors and are never relocated. Removal marks
//!   the slot as cleared (tombstone); handles are never reused, so vertex ids
//!   cached in bit-sets and identity maps stay meaningful.
//! - Each node keeps ordered in/out adjacency lists of live edges only.
//! - At most one edge per ordered (source, target) pair. Callers check
//!   [`Graph::find_edge`] before [`Graph::add_edge`].
//!
//! Stale handles (removed or out of range) are engine bugs and panic.

use std::fmt;
use std::io;

/// Node handle
pub type NodeId = u32;

/// Edge handle
pub type EdgeId = u32;

#[derive(Debug, Clone, Default)]
struct NodeEntry {
    in_edges: Vec<EdgeId>,
    out_edges: Vec<EdgeId>,
    cleared: bool,
}

#[derive(Debug, Clone, Copy)]
struct EdgeEntry {
    source: NodeId,
    target: NodeId,
    cleared: bool,
}

/// Directed graph with tombstoned removal
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<NodeEntry>,
    edges: Vec<EdgeEntry>,
    num_nodes: usize,
    num_edges: usize,
}

impl Graph {
    /// Construct an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with pre-allocated slots
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            num_nodes: 0,
            num_edges: 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internal: checked slot access
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    fn node(&self, n: NodeId) -> &NodeEntry {
        match self.nodes.get(n as usize) {
            Some(entry) if !entry.cleared => entry,
            _ => panic!("attempt to access a removed node {n}"),
        }
    }

    #[inline]
    fn node_mut(&mut self, n: NodeId) -> &mut NodeEntry {
        match self.nodes.get_mut(n as usize) {
            Some(entry) if !entry.cleared => entry,
            _ => panic!("attempt to access a removed node {n}"),
        }
    }

    #[inline]
    fn edge(&self, e: EdgeId) -> &EdgeEntry {
        match self.edges.get(e as usize) {
            Some(entry) if !entry.cleared => entry,
            _ => panic!("attempt to access a removed edge {e}"),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Insertion
    // ═══════════════════════════════════════════════════════════════════════

    /// Add a node and return its handle
    pub fn add_node(&mut self) -> NodeId {
        self.nodes.push(NodeEntry::default());
        self.num_nodes += 1;
        (self.nodes.len() - 1) as NodeId
    }

    /// Add a directed edge from `source` to `target`
    ///
    /// Debug builds assert that the ordered pair is not already connected.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        debug_assert!(
            self.find_edge(source, target).is_none(),
            "attempt to add duplicate edge ({source}, {target})"
        );
        // Validate both endpoints before touching storage.
        self.node(target);
        let edge = self.edges.len() as EdgeId;
        self.node_mut(source).out_edges.push(edge);
        self.node_mut(target).in_edges.push(edge);
        self.edges.push(EdgeEntry {
            source,
            target,
            cleared: false,
        });
        self.num_edges += 1;
        edge
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Number of live nodes
    #[inline]
    pub fn node_count(&self) -> usize {
        self.num_nodes
    }

    /// Number of live edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.num_edges
    }

    /// One past the largest node handle ever handed out
    #[inline]
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    /// Check if `n` is a live node
    #[inline]
    pub fn contains_node(&self, n: NodeId) -> bool {
        self.nodes.get(n as usize).is_some_and(|entry| !entry.cleared)
    }

    /// Check if `e` is a live edge
    #[inline]
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.get(e as usize).is_some_and(|entry| !entry.cleared)
    }

    /// Live nodes in ascending handle order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.cleared)
            .map(|(i, _)| i as NodeId)
    }

    /// Live edges in ascending handle order
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.cleared)
            .map(|(i, _)| i as EdgeId)
    }

    /// Incoming edges of `n`, in insertion order
    #[inline]
    pub fn in_edges(&self, n: NodeId) -> &[EdgeId] {
        &self.node(n).in_edges
    }

    /// Outgoing edges of `n`, in insertion order
    #[inline]
    pub fn out_edges(&self, n: NodeId) -> &[EdgeId] {
        &self.node(n).out_edges
    }

    /// Targets of the outgoing edges of `n`
    pub fn successors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(n).iter().map(move |&e| self.edge_target(e))
    }

    /// Sources of the incoming edges of `n`
    pub fn predecessors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.in_edges(n).iter().map(move |&e| self.edge_source(e))
    }

    #[inline]
    pub fn edge_source(&self, e: EdgeId) -> NodeId {
        self.edge(e).source
    }

    #[inline]
    pub fn edge_target(&self, e: EdgeId) -> NodeId {
        self.edge(e).target
    }

    /// (source, target) of an edge
    #[inline]
    pub fn edge_endpoints(&self, e: EdgeId) -> (NodeId, NodeId) {
        let entry = self.edge(e);
        (entry.source, entry.target)
    }

    /// Find the edge `source → target` by scanning the out-edges of `source`
    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.out_edges(source)
            .iter()
            .copied()
            .find(|&e| self.edge_target(e) == target)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Removal
    // ═══════════════════════════════════════════════════════════════════════

    /// Remove a node together with every incident edge
    pub fn remove_node(&mut self, n: NodeId) {
        let incoming = self.node(n).in_edges.clone();
        for e in incoming {
            self.remove_edge(e);
        }
        // Self-loops are already gone with the incoming list.
        let outgoing = self.node(n).out_edges.clone();
        for e in outgoing {
            self.remove_edge(e);
        }
        self.nodes[n as usize].cleared = true;
        self.num_nodes -= 1;
    }

    /// Remove an edge from both endpoint adjacency lists
    pub fn remove_edge(&mut self, e: EdgeId) {
        let (source, target) = self.edge_endpoints(e);
        let out_edges = &mut self.node_mut(source).out_edges;
        if let Some(pos) = out_edges.iter().position(|&x| x == e) {
            out_edges.remove(pos);
        }
        let in_edges = &mut self.node_mut(target).in_edges;
        if let Some(pos) = in_edges.iter().position(|&x| x == e) {
            in_edges.remove(pos);
        }
        self.edges[e as usize].cleared = true;
        self.num_edges -= 1;
    }

    /// Remove all nodes and edges
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.num_nodes = 0;
        self.num_edges = 0;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Output
    // ═══════════════════════════════════════════════════════════════════════

    /// Print the graph in DOT format with node ids as labels
    pub fn write_dot<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_dot_with(out, |n| n.to_string())
    }

    /// Print the graph in DOT format with caller-supplied node labels
    pub fn write_dot_with<W, F>(&self, out: &mut W, label: F) -> io::Result<()>
    where
        W: io::Write,
        F: Fn(NodeId) -> String,
    {
        writeln!(out, "digraph {{")?;
        for n in self.nodes() {
            writeln!(out, "  {} [label=\"{}\"]", n, label(n))?;
        }
        for e in self.edges() {
            let (source, target) = self.edge_endpoints(e);
            writeln!(out, "  {} -> {}", source, target)?;
        }
        writeln!(out, "}}")
    }
}

/// `nodes: 0, 1, 2` / `edges: (0, 1), (1, 2)`
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<String> = self.nodes().map(|n| n.to_string()).collect();
        writeln!(f, "nodes: {}", nodes.join(", "))?;
        let edges: Vec<String> = self
            .edges()
            .map(|e| {
                let (source, target) = self.edge_endpoints(e);
                format!("({}, {})", source, target)
            })
            .collect();
        writeln!(f, "edges: {}", edges.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Graph, [NodeId; 3]) {
        let mut g = Graph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        g.add_edge(a, b);
        g.add_edge(b, c);
        g.add_edge(c, a);
        (g, [a, b, c])
    }

    #[test]
    fn test_add_and_find() {
        let (g, [a, b, c]) = triangle();

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        let e = g.find_edge(a, b).unwrap();
        assert_eq!(g.edge_endpoints(e), (a, b));
        assert_eq!(g.find_edge(b, a), None);
        assert_eq!(g.successors(b).collect::<Vec<_>>(), vec![c]);
        assert_eq!(g.predecessors(a).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate edge")]
    fn test_duplicate_edge_panics() {
        let (mut g, [a, b, _]) = triangle();
        g.add_edge(a, b);
    }

    #[test]
    fn test_remove_node_tombstones() {
        let (mut g, [a, b, c]) = triangle();
        g.remove_node(b);

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(!g.contains_node(b));
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![a, c]);
        assert!(g.out_edges(a).is_empty());
        assert!(g.in_edges(c).is_empty());
        assert_eq!(g.edges().count(), 1);

        // Fresh handles never reuse the cleared slot.
        let d = g.add_node();
        assert_eq!(d, 3);
        assert_eq!(g.node_bound(), 4);
    }

    #[test]
    fn test_remove_node_with_self_loop() {
        let mut g = Graph::new();
        let a = g.add_node();
        let b = g.add_node();
        g.add_edge(a, a);
        g.add_edge(a, b);
        g.add_edge(b, a);

        g.remove_node(a);
        assert_eq!(g.edge_count(), 0);
        assert!(g.in_edges(b).is_empty());
        assert!(g.out_edges(b).is_empty());
    }

    #[test]
    fn test_remove_edge_keeps_order() {
        let mut g = Graph::new();
        let hub = g.add_node();
        let targets: Vec<_> = (0..4).map(|_| g.add_node()).collect();
        for &t in &targets {
            g.add_edge(hub, t);
        }
        let e = g.find_edge(hub, targets[1]).unwrap();
        g.remove_edge(e);

        assert!(!g.contains_edge(e));
        assert_eq!(
            g.successors(hub).collect::<Vec<_>>(),
            vec![targets[0], targets[2], targets[3]]
        );
        // The pair may be connected again once the old edge is gone.
        let again = g.add_edge(hub, targets[1]);
        assert_ne!(again, e);
    }

    #[test]
    #[should_panic(expected = "removed node")]
    fn test_stale_node_panics() {
        let (mut g, [a, _, _]) = triangle();
        g.remove_node(a);
        g.out_edges(a);
    }

    #[test]
    #[should_panic(expected = "removed edge")]
    fn test_stale_edge_panics() {
        let (mut g, [a, b, _]) = triangle();
        let e = g.find_edge(a, b).unwrap();
        g.remove_edge(e);
        g.edge_target(e);
    }

    #[test]
    fn test_display_dump() {
        let (mut g, [_, b, _]) = triangle();
        g.remove_node(b);
        assert_eq!(g.to_string(), "nodes: 0, 2\nedges: (2, 0)\n");
    }

    #[test]
    fn test_write_dot() {
        let (g, _) = triangle();
        let mut out = Vec::new();
        g.write_dot(&mut out).unwrap();
        let dot = String::from_utf8(out).unwrap();

        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.contains("  1 [label=\"1\"]\n"));
        assert!(dot.contains("  2 -> 0\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_clear() {
        let (mut g, _) = triangle();
        g.clear();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.nodes().count(), 0);
    }
}
