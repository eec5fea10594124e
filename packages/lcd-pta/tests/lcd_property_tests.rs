//! Property-based tests for the LCD solver
//!
//! Invariants that should hold for ALL constraint systems:
//! - Reflexivity: alias(x, x)
//! - Soundness: copy / load / store relations show up as aliases
//! - Transparency: collapsing cycles never changes an alias answer
//! - Idempotence: solve(solve(x)) answers like solve(x)
//! - Traversal: DepthFirst visits exactly the reachable set

use lcd_pta::features::points_to::{DepthFirst, Graph};
use lcd_pta::{ConstraintKind, LcdSolver, PointsToSolver, SolverConfig};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use proptest::prelude::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::collections::BTreeSet;

const LOCATIONS: u8 = 8;

type RawConstraint = (ConstraintKind, u8, u8);

fn kind_from(tag: u8) -> ConstraintKind {
    match tag % 4 {
        0 => ConstraintKind::AddressOf,
        1 => ConstraintKind::Copy,
        2 => ConstraintKind::Load,
        _ => ConstraintKind::Store,
    }
}

fn constraint_strategy() -> impl Strategy<Value = RawConstraint> {
    (0u8..4, 0..LOCATIONS, 0..LOCATIONS).prop_map(|(tag, lhs, rhs)| (kind_from(tag), lhs, rhs))
}

fn solved(constraints: &[RawConstraint], cycle_detection: bool) -> LcdSolver<u8> {
    let config = SolverConfig::default().cycle_detection(cycle_detection);
    let mut solver = LcdSolver::new(config);
    for &(kind, lhs, rhs) in constraints {
        solver.add(kind, lhs, rhs);
    }
    solver.solve();
    solver
}

fn alias_matrix(solver: &LcdSolver<u8>) -> Vec<bool> {
    (0..LOCATIONS)
        .flat_map(|a| (0..LOCATIONS).map(move |b| (a, b)))
        .map(|(a, b)| solver.alias(&a, &b))
        .collect()
}

/// Naive Andersen fixpoint over explicit points-to sets
fn reference_points_to(constraints: &[RawConstraint]) -> Vec<BTreeSet<u8>> {
    let mut pts = vec![BTreeSet::new(); LOCATIONS as usize];
    let mut changed = true;
    while changed {
        changed = false;
        for &(kind, lhs, rhs) in constraints {
            let (l, r) = (lhs as usize, rhs as usize);
            match kind {
                ConstraintKind::AddressOf => changed |= pts[l].insert(rhs),
                ConstraintKind::Copy => {
                    let src = pts[r].clone();
                    for o in src {
                        changed |= pts[l].insert(o);
                    }
                }
                ConstraintKind::Load => {
                    for o in pts[r].clone() {
                        for x in pts[o as usize].clone() {
                            changed |= pts[l].insert(x);
                        }
                    }
                }
                ConstraintKind::Store => {
                    for o in pts[l].clone() {
                        for x in pts[r].clone() {
                            changed |= pts[o as usize].insert(x);
                        }
                    }
                }
            }
        }
    }
    pts
}

// ============================================================================
// QuickCheck Tests (simpler, faster)
// ============================================================================

#[quickcheck]
fn qc_alias_is_reflexive(raw: Vec<(u8, u8, u8)>) -> bool {
    let constraints: Vec<RawConstraint> = raw
        .into_iter()
        .take(30)
        .map(|(tag, l, r)| (kind_from(tag), l % LOCATIONS, r % LOCATIONS))
        .collect();
    let solver = solved(&constraints, true);

    (0..=u8::MAX).all(|x| solver.alias(&x, &x))
}

#[quickcheck]
fn qc_copy_chain_is_sound(len: u8) -> TestResult {
    if len == 0 || len > 64 {
        return TestResult::discard();
    }
    let mut solver = LcdSolver::default();
    solver.add(ConstraintKind::AddressOf, 0u8, u8::MAX);
    for i in 0..len {
        solver.add(ConstraintKind::Copy, i + 1, i);
    }
    solver.solve();

    TestResult::from_bool(solver.alias(&len, &0) && !solver.alias(&0, &len))
}

// ============================================================================
// Proptest Tests (more control over generation)
// ============================================================================

proptest! {
    #[test]
    fn prop_copy_constraints_alias(
        constraints in prop::collection::vec(constraint_strategy(), 0..30),
    ) {
        let solver = solved(&constraints, true);

        // Invariant: lhs = rhs means rhs flows into lhs
        for &(kind, lhs, rhs) in &constraints {
            if kind == ConstraintKind::Copy {
                prop_assert!(solver.alias(&lhs, &rhs), "Copy({}, {}) lost", lhs, rhs);
            }
        }
    }

    #[test]
    fn prop_load_store_sound(
        constraints in prop::collection::vec(constraint_strategy(), 0..30),
    ) {
        let solver = solved(&constraints, true);
        let reference = reference_points_to(&constraints);

        for &(kind, lhs, rhs) in &constraints {
            match kind {
                // lhs = *rhs: every pointee of rhs flows into lhs
                ConstraintKind::Load => {
                    for &o in &reference[rhs as usize] {
                        prop_assert!(solver.alias(&lhs, &o), "Load({}, {}) via {}", lhs, rhs, o);
                    }
                }
                // *lhs = rhs: rhs flows into every pointee of lhs
                ConstraintKind::Store => {
                    for &o in &reference[lhs as usize] {
                        prop_assert!(solver.alias(&o, &rhs), "Store({}, {}) via {}", lhs, rhs, o);
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn prop_points_to_over_approximates(
        constraints in prop::collection::vec(constraint_strategy(), 0..30),
    ) {
        let solver = solved(&constraints, true);
        let reference = reference_points_to(&constraints);

        for x in 0..LOCATIONS {
            let Some(pointees) = solver.points_to(&x) else {
                prop_assert!(reference[x as usize].is_empty());
                continue;
            };
            let pointees: BTreeSet<u8> = pointees.into_iter().collect();
            prop_assert!(
                reference[x as usize].is_subset(&pointees),
                "pts({}) = {:?} misses {:?}", x, pointees, reference[x as usize]
            );
        }
    }

    #[test]
    fn prop_collapse_is_transparent(
        constraints in prop::collection::vec(constraint_strategy(), 0..30),
    ) {
        let with_lcd = solved(&constraints, true);
        let without_lcd = solved(&constraints, false);

        prop_assert_eq!(alias_matrix(&with_lcd), alias_matrix(&without_lcd));
        prop_assert_eq!(without_lcd.stats().vertices_collapsed, 0);
        prop_assert_eq!(
            with_lcd.graph().node_count() + with_lcd.stats().vertices_collapsed,
            with_lcd.stats().vertices
        );
    }

    #[test]
    fn prop_solve_is_idempotent(
        constraints in prop::collection::vec(constraint_strategy(), 0..30),
    ) {
        let mut solver = solved(&constraints, true);
        let first = alias_matrix(&solver);
        solver.solve();

        prop_assert_eq!(first, alias_matrix(&solver));
    }

    #[test]
    fn prop_depth_first_matches_reachability(
        edges in prop::collection::btree_set((0u32..10, 0u32..10), 0..40),
        start in 0u32..10,
    ) {
        let mut graph = Graph::new();
        let mut oracle: DiGraph<(), ()> = DiGraph::new();
        for _ in 0..10 {
            graph.add_node();
            oracle.add_node(());
        }
        for &(s, t) in &edges {
            graph.add_edge(s, t);
            oracle.add_edge(NodeIndex::new(s as usize), NodeIndex::new(t as usize), ());
        }

        let mut expected = BTreeSet::new();
        let mut dfs = Dfs::new(&oracle, NodeIndex::new(start as usize));
        while let Some(nx) = dfs.next(&oracle) {
            expected.insert(nx.index() as u32);
        }

        let mut visited = BTreeSet::new();
        let mut walker = DepthFirst::new(&graph, start);
        while let Some(node) = walker.next() {
            // Invariant: the stack is always a real path from the start
            let path = walker.path();
            prop_assert_eq!(path.first().copied(), Some(start));
            prop_assert_eq!(path.last().copied(), Some(node));
            for pair in path.windows(2) {
                prop_assert!(graph.find_edge(pair[0], pair[1]).is_some());
            }
            prop_assert!(visited.insert(node), "{} visited twice", node);
        }

        prop_assert_eq!(visited, expected);
    }
}
