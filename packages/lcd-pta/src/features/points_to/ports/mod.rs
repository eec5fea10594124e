//! Ports (Interfaces) for Points-to Analysis
//!
//! Accumulate → solve → query, in that order:
//! - `add_constraint` is cheap and may be called in any order
//! - `solve` runs once, after every constraint is in
//! - `alias` is read-only afterwards
//!
//! Generic bounds (`S: PointsToSolver`) keep callers zero-cost; the trait is
//! also object safe for a fixed `Location`.

use crate::features::points_to::domain::abstract_location::AbstractLocation;
use crate::features::points_to::domain::constraint::{Constraint, ConstraintKind};

/// Inclusion-based points-to solver
///
/// # Example (Generic - Zero-cost)
/// ```ignore
/// fn analyze<S: PointsToSolver<Location = u32>>(solver: &mut S) -> bool {
///     solver.add(ConstraintKind::AddressOf, 1, 10);
///     solver.add(ConstraintKind::Copy, 2, 1);
///     solver.solve();
///     solver.alias(&2, &1)
/// }
/// ```
pub trait PointsToSolver {
    /// Client location token
    type Location: AbstractLocation;

    /// Record one constraint
    fn add_constraint(&mut self, constraint: Constraint<Self::Location>);

    /// Build and record a constraint from its parts
    fn add(&mut self, kind: ConstraintKind, lhs: Self::Location, rhs: Self::Location) {
        self.add_constraint(Constraint::new(kind, lhs, rhs));
    }

    /// Record many constraints
    fn add_constraints<I>(&mut self, constraints: I)
    where
        I: IntoIterator<Item = Constraint<Self::Location>>,
        Self: Sized,
    {
        for c in constraints {
            self.add_constraint(c);
        }
    }

    /// Compute the fixpoint over every recorded constraint
    fn solve(&mut self);

    /// May `a` alias `b`? `false` is a sound no-alias answer.
    fn alias(&self, a: &Self::Location, b: &Self::Location) -> bool;
}
