//! Lazy Cycle Detection (LCD) Solver
//!
//! Worklist Andersen solver over a constraint graph whose copy edges point
//! from rhs to lhs (pts flows along edges). Complex constraints (LOAD, STORE)
//! are kept as per-vertex bit-sets and turned into edges as points-to sets
//! grow.
//!
//! # Cycle detection
//! When an edge `n → z` joins two vertices with identical points-to sets, the
//! solver suspects a cycle through `z`, searches for one with a path-tracking
//! DFS and collapses every cycle found into `z`. Each `(n, z)` pair triggers
//! at most one search per solve.
//!
//! # Collapse
//! Absorbed vertices hand their edges, bit-set rows and locations to the
//! survivor, every bit naming them is rewritten to the survivor, and the
//! vertex is removed from the graph. Collapsing is unobservable through
//! [`alias`](LcdSolver::alias).
//!
//! # References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Hardekopf & Lin "The Ant and the Grasshopper" (PLDI 2007)

use super::bit_vector::BitVector;
use super::depth_first::DepthFirst;
use super::graph::{Graph, NodeId};
use crate::config::SolverConfig;
use crate::features::points_to::domain::abstract_location::AbstractLocation;
use crate::features::points_to::domain::constraint::{Constraint, ConstraintKind};
use crate::features::points_to::ports::PointsToSolver;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::io;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Largest capacity hint honoured up front; bigger hints grow on demand
const MAX_PREALLOCATED: usize = 1 << 16;

/// Solver statistics
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcdStats {
    pub constraints_total: usize,
    pub constraints_address_of: usize,
    pub constraints_copy: usize,
    pub constraints_load: usize,
    pub constraints_store: usize,
    /// Vertices ever created
    pub vertices: usize,
    /// Vertices alive after the last solve
    pub live_vertices: usize,
    /// Edges alive after the last solve
    pub edges: usize,
    /// Worklist pops
    pub iterations: usize,
    /// Points-to unions that grew the target
    pub propagations: usize,
    /// Edges materialized from LOAD / STORE
    pub complex_edges: usize,
    pub cycle_searches: usize,
    pub cycles_collapsed: usize,
    /// Vertices absorbed into a survivor
    pub vertices_collapsed: usize,
    pub duration_ms: f64,
}

/// Andersen solver with Lazy Cycle Detection
#[derive(Debug, Clone)]
pub struct LcdSolver<L: AbstractLocation> {
    /// Configuration
    config: SolverConfig,

    /// Constraint graph (copy edges rhs → lhs)
    graph: Graph,

    /// Per-vertex rows, indexed by vertex id
    pts: Vec<BitVector>,
    stores: Vec<BitVector>,
    loads: Vec<BitVector>,

    /// Location → vertex
    locations: FxHashMap<L, NodeId>,

    /// Vertex → locations it stands for (empty once absorbed)
    members: Vec<Vec<L>>,

    /// Statistics
    stats: LcdStats,

    solved: bool,
}

impl<L: AbstractLocation> Default for LcdSolver<L> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<L: AbstractLocation> LcdSolver<L> {
    pub fn new(config: SolverConfig) -> Self {
        let capacity = config.expected_locations.min(MAX_PREALLOCATED);
        Self {
            config,
            graph: Graph::with_capacity(capacity, capacity),
            pts: Vec::with_capacity(capacity),
            stores: Vec::with_capacity(capacity),
            loads: Vec::with_capacity(capacity),
            locations: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            members: Vec::with_capacity(capacity),
            stats: LcdStats::default(),
            solved: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Statistics of the constraints seen so far and the last solve
    #[inline]
    pub fn stats(&self) -> &LcdStats {
        &self.stats
    }

    /// The constraint graph
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Whether `solve()` has run
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Number of distinct locations seen
    #[inline]
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Vertex currently representing `loc`
    #[inline]
    pub fn vertex_of(&self, loc: &L) -> Option<NodeId> {
        self.locations.get(loc).copied()
    }

    /// Locations represented by a live vertex
    pub fn members_of(&self, vertex: NodeId) -> &[L] {
        self.members
            .get(vertex as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Return the vertex for `loc`, creating one on first sight
    fn ensure_vertex(&mut self, loc: &L) -> NodeId {
        if let Some(&vertex) = self.locations.get(loc) {
            return vertex;
        }
        let vertex = self.graph.add_node();
        debug_assert_eq!(vertex as usize, self.members.len());
        self.pts.push(BitVector::new());
        self.stores.push(BitVector::new());
        self.loads.push(BitVector::new());
        self.members.push(vec![loc.clone()]);
        self.locations.insert(loc.clone(), vertex);
        self.stats.vertices += 1;
        vertex
    }

    /// Record one constraint
    pub fn add_constraint(&mut self, constraint: Constraint<L>) {
        if self.solved {
            warn!(
                "constraint {} added after solve; call solve() again to account for it",
                constraint.kind().as_str()
            );
        }

        let lhs = self.ensure_vertex(constraint.lhs());
        let rhs = self.ensure_vertex(constraint.rhs());
        self.stats.constraints_total += 1;

        match constraint.kind() {
            ConstraintKind::AddressOf => {
                self.stats.constraints_address_of += 1;
                self.pts[lhs as usize].insert(rhs);
            }
            ConstraintKind::Copy => {
                self.stats.constraints_copy += 1;
                if self.graph.find_edge(rhs, lhs).is_none() {
                    self.graph.add_edge(rhs, lhs);
                }
            }
            ConstraintKind::Store => {
                self.stats.constraints_store += 1;
                self.stores[lhs as usize].insert(rhs);
            }
            ConstraintKind::Load => {
                self.stats.constraints_load += 1;
                self.loads[rhs as usize].insert(lhs);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Solving
    // ═══════════════════════════════════════════════════════════════════════

    /// Run the worklist to its fixpoint
    pub fn solve(&mut self) {
        let start = Instant::now();
        let mut worklist: BitVector = self.graph.nodes().collect();
        let mut checked: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();

        while let Some(n) = worklist.pop_first() {
            debug_assert!(self.graph.contains_node(n));
            self.stats.iterations += 1;
            trace!("lcd: visiting vertex {}", n);

            self.add_complex_edges(n, &mut worklist);

            let mut successors: BitVector = self.graph.successors(n).collect();
            let mut cursor = successors.first();
            while let Some(z) = cursor {
                if z != n {
                    if self.pts[n as usize] == self.pts[z as usize] {
                        if self.config.cycle_detection && checked.insert((n, z)) {
                            for path in self.find_cycles(z) {
                                for absorbed in self.collapse(&path, &mut worklist) {
                                    successors.remove(absorbed);
                                }
                            }
                            if !self.graph.contains_node(n) {
                                // n was absorbed; its survivor is already queued.
                                break;
                            }
                        }
                    } else if union_rows(&mut self.pts, z, n) {
                        self.stats.propagations += 1;
                        worklist.insert(z);
                    }
                }
                cursor = successors.next_after(z);
            }
        }

        self.solved = true;
        self.stats.live_vertices = self.graph.node_count();
        self.stats.edges = self.graph.edge_count();
        self.stats.duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            "lcd: solved {} constraints: {} live of {} vertices, {} edges, {} iterations, {} cycles collapsed ({:.2}ms)",
            self.stats.constraints_total,
            self.stats.live_vertices,
            self.stats.vertices,
            self.stats.edges,
            self.stats.iterations,
            self.stats.cycles_collapsed,
            self.stats.duration_ms
        );
    }

    /// Materialize LOAD / STORE edges for every pointee of `n`
    fn add_complex_edges(&mut self, n: NodeId, worklist: &mut BitVector) {
        let idx = n as usize;
        if self.loads[idx].is_empty() && self.stores[idx].is_empty() {
            return;
        }
        let pointees: Vec<NodeId> = self.pts[idx].iter().collect();
        let loads: Vec<NodeId> = self.loads[idx].iter().collect();
        let stores: Vec<NodeId> = self.stores[idx].iter().collect();

        for v in pointees {
            // a = *n: pts(a) ⊇ pts(v)
            for &a in &loads {
                if v != a && self.graph.find_edge(v, a).is_none() {
                    self.graph.add_edge(v, a);
                    self.stats.complex_edges += 1;
                    worklist.insert(v);
                }
            }
            // *n = b: pts(v) ⊇ pts(b)
            for &b in &stores {
                if b != v && self.graph.find_edge(b, v).is_none() {
                    self.graph.add_edge(b, v);
                    self.stats.complex_edges += 1;
                    worklist.insert(b);
                }
            }
        }
    }

    /// Every path `z → ... → x` whose top frame's next edge returns to `z`
    fn find_cycles(&mut self, z: NodeId) -> Vec<Vec<NodeId>> {
        self.stats.cycle_searches += 1;
        let mut cycles = Vec::new();
        let mut dfs = DepthFirst::new(&self.graph, z);
        while dfs.next().is_some() {
            if let Some(edge) = dfs.peek_next() {
                if self.graph.edge_target(edge) == z {
                    cycles.push(dfs.path());
                }
            }
        }
        cycles
    }

    /// Merge every vertex of `path` into its first vertex
    ///
    /// Returns the vertices removed from the graph. Vertices already absorbed
    /// by an earlier cycle of the same search are skipped.
    fn collapse(&mut self, path: &[NodeId], worklist: &mut BitVector) -> Vec<NodeId> {
        let Some((&origin, rest)) = path.split_first() else {
            return Vec::new();
        };
        let mut absorbed = Vec::new();

        for &u in rest {
            if u == origin || !self.graph.contains_node(u) {
                continue;
            }

            let predecessors: Vec<NodeId> = self.graph.predecessors(u).collect();
            for v in predecessors {
                if v != u && v != origin && self.graph.find_edge(v, origin).is_none() {
                    self.graph.add_edge(v, origin);
                }
            }
            let successors: Vec<NodeId> = self.graph.successors(u).collect();
            for v in successors {
                if v != u && v != origin && self.graph.find_edge(origin, v).is_none() {
                    self.graph.add_edge(origin, v);
                }
            }

            for rows in [&mut self.pts, &mut self.stores, &mut self.loads] {
                union_rows(rows, origin, u);
                rows[u as usize].clear();
            }

            // Bits naming u now name origin.
            let live: Vec<NodeId> = self.graph.nodes().collect();
            for x in live {
                let mut changed = false;
                for rows in [&mut self.pts, &mut self.stores, &mut self.loads] {
                    let row = &mut rows[x as usize];
                    if row.remove(u) {
                        row.insert(origin);
                        changed = true;
                    }
                }
                if changed {
                    worklist.insert(x);
                }
            }

            let moved = std::mem::take(&mut self.members[u as usize]);
            for loc in &moved {
                self.locations.insert(loc.clone(), origin);
            }
            self.members[origin as usize].extend(moved);

            self.graph.remove_node(u);
            worklist.remove(u);
            absorbed.push(u);
        }

        if !absorbed.is_empty() {
            worklist.insert(origin);
            self.stats.cycles_collapsed += 1;
            self.stats.vertices_collapsed += absorbed.len();
            debug!(
                "lcd: collapsed cycle into vertex {} ({} absorbed)",
                origin,
                absorbed.len()
            );
        }
        absorbed
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// May `a` alias `b`?
    ///
    /// True when vertex(a) is reachable from vertex(b). Not symmetric.
    pub fn alias(&self, a: &L, b: &L) -> bool {
        if a == b {
            return true;
        }
        let (Some(&va), Some(&vb)) = (self.locations.get(a), self.locations.get(b)) else {
            return false;
        };
        va == vb || DepthFirst::new(&self.graph, vb).any(|n| n == va)
    }

    /// Check if two locations share a vertex
    pub fn same_vertex(&self, a: &L, b: &L) -> bool {
        match (self.locations.get(a), self.locations.get(b)) {
            (Some(va), Some(vb)) => va == vb,
            _ => false,
        }
    }

    /// Locations `loc` may point to, `None` if `loc` was never seen
    pub fn points_to(&self, loc: &L) -> Option<Vec<L>> {
        let vertex = *self.locations.get(loc)?;
        Some(
            self.pts[vertex as usize]
                .iter()
                .flat_map(|v| self.members_of(v).iter().cloned())
                .collect(),
        )
    }

    /// Answer many alias queries in parallel
    pub fn alias_batch(&self, pairs: &[(L, L)]) -> Vec<bool>
    where
        L: Sync,
    {
        pairs.par_iter().map(|(a, b)| self.alias(a, b)).collect()
    }

    /// Print the graph in DOT format, labelling each vertex with its
    /// points-to set (`3 {1,2}`)
    pub fn write_dot<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.graph.write_dot_with(out, |n| {
            let pointees: Vec<String> = self.pts[n as usize].iter().map(|v| v.to_string()).collect();
            format!("{} {{{}}}", n, pointees.join(","))
        })
    }

    /// Drop every constraint, vertex and statistic
    pub fn clear(&mut self) {
        self.graph.clear();
        self.pts.clear();
        self.stores.clear();
        self.loads.clear();
        self.locations.clear();
        self.members.clear();
        self.stats = LcdStats::default();
        self.solved = false;
    }
}

impl<L: AbstractLocation> PointsToSolver for LcdSolver<L> {
    type Location = L;

    fn add_constraint(&mut self, constraint: Constraint<L>) {
        LcdSolver::add_constraint(self, constraint);
    }

    fn solve(&mut self) {
        LcdSolver::solve(self);
    }

    fn alias(&self, a: &L, b: &L) -> bool {
        LcdSolver::alias(self, a, b)
    }
}

/// rows[dst] |= rows[src]. Returns true if rows[dst] grew.
fn union_rows(rows: &mut [BitVector], dst: NodeId, src: NodeId) -> bool {
    let (dst, src) = (dst as usize, src as usize);
    if dst == src {
        return false;
    }
    if dst < src {
        let (lo, hi) = rows.split_at_mut(src);
        lo[dst].union_with(&hi[0])
    } else {
        let (lo, hi) = rows.split_at_mut(dst);
        hi[0].union_with(&lo[src])
    }
}
