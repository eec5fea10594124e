/*
 * LCD-PTA - Inclusion-based Points-to Analysis Engine
 *
 * Feature-First Hexagonal Architecture:
 * - config/    : Solver configuration (YAML, validation)
 * - features/  : Vertical slices (points_to: domain → infrastructure → ports → application)
 * - errors     : Crate-wide error type
 *
 * Algorithm:
 * - Andersen-style subset constraints (AddressOf, Copy, Load, Store)
 * - Lazy Cycle Detection: collapse copy cycles on the fly while solving
 * - Reachability-based alias queries over the solved constraint graph
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

/// Solver configuration
pub mod config;

/// Error types
pub mod errors;

/// Feature modules
pub mod features;

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, ConfigResult, SolverConfig};
pub use errors::{PtaError, Result};
pub use features::points_to::{
    AbstractLocation, AnalysisResult, Constraint, ConstraintKind, ConstraintSet, LcdSolver,
    LcdStats, LocationId, PointsToAnalyzer, PointsToSolver,
};
