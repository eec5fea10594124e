//! # Points-to Analysis with Lazy Cycle Detection
//!
//! Inclusion-based (Andersen-style) pointer analysis:
//! - **Constraints**: AddressOf, Copy, Load, Store over opaque client locations
//! - **Constraint graph**: tombstoned adjacency lists, copy edges rhs → lhs
//! - **Lazy Cycle Detection**: when a copy edge joins two vertices with equal
//!   points-to sets, search for cycles through the target and collapse them
//! - **Alias queries**: forward reachability in the solved graph
//!
//! ## Academic References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Hardekopf & Lin "The Ant and the Grasshopper" (PLDI 2007)
//!
//! ## Usage
//! ```text
//! use lcd_pta::features::points_to::{Constraint, LcdSolver, PointsToSolver};
//!
//! let mut solver = LcdSolver::default();
//! solver.add_constraint(Constraint::address_of("p", "obj"));
//! solver.add_constraint(Constraint::copy("q", "p"));
//! solver.solve();
//! assert!(solver.alias(&"q", &"p"));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for public API
pub use application::analyzer::{AnalysisResult, PointsToAnalyzer};
pub use domain::abstract_location::{AbstractLocation, LocationId, LocationInterner};
pub use domain::constraint::{Constraint, ConstraintKind, ConstraintSet};
pub use infrastructure::lcd_solver::{LcdSolver, LcdStats};
pub use ports::PointsToSolver;
// Re-export infrastructure (internal use - prefer the solver API)
#[doc(hidden)]
pub use infrastructure::bit_vector::BitVector;
#[doc(hidden)]
pub use infrastructure::depth_first::DepthFirst;
#[doc(hidden)]
pub use infrastructure::graph::{EdgeId, Graph, NodeId};
