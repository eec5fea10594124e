//! High-Level Points-to Analyzer
//!
//! Name-keyed front door over [`LcdSolver`]: locations are plain strings,
//! interned to [`LocationId`] on first sight.
//!
//! # Usage
//! ```text
//! use lcd_pta::{PointsToAnalyzer, SolverConfig};
//!
//! let mut analyzer = PointsToAnalyzer::new(SolverConfig::default())?;
//! analyzer.add_address_of("p", "obj");
//! analyzer.add_copy("q", "p");
//!
//! let result = analyzer.solve()?;
//! assert!(analyzer.may_alias("q", "p"));
//! ```

use crate::config::SolverConfig;
use crate::errors::{PtaError, Result};
use crate::features::points_to::domain::{
    abstract_location::{LocationId, LocationInterner},
    constraint::{Constraint, ConstraintKind},
};
use crate::features::points_to::infrastructure::lcd_solver::{LcdSolver, LcdStats};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

/// Outcome of [`PointsToAnalyzer::solve`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Solver statistics
    pub stats: LcdStats,

    /// Distinct location names seen
    pub locations: usize,

    /// Where the DOT dump was written, if configured
    pub dot_dump: Option<PathBuf>,
}

/// High-level points-to analyzer
#[derive(Debug)]
pub struct PointsToAnalyzer {
    /// Configuration
    config: SolverConfig,

    /// Location name ↔ ID mapping
    interner: LocationInterner,

    /// Underlying solver
    solver: LcdSolver<LocationId>,
}

impl Default for PointsToAnalyzer {
    fn default() -> Self {
        Self::with_valid_config(SolverConfig::default())
    }
}

impl PointsToAnalyzer {
    /// Create an analyzer after validating `config`
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SolverConfig) -> Self {
        Self {
            interner: LocationInterner::with_capacity(config.expected_locations.min(1 << 16)),
            solver: LcdSolver::new(config.clone()),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Underlying solver, keyed by interned ids
    #[inline]
    pub fn solver(&self) -> &LcdSolver<LocationId> {
        &self.solver
    }

    /// Interned id of a name, if any constraint mentioned it
    #[inline]
    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.interner.get(name)
    }

    /// Add a constraint between two named locations
    pub fn add(&mut self, kind: ConstraintKind, lhs: &str, rhs: &str) {
        let lhs = self.interner.intern(lhs);
        let rhs = self.interner.intern(rhs);
        self.solver.add_constraint(Constraint::new(kind, lhs, rhs));
    }

    /// lhs = &rhs
    pub fn add_address_of(&mut self, lhs: &str, rhs: &str) {
        self.add(ConstraintKind::AddressOf, lhs, rhs);
    }

    /// lhs = rhs
    pub fn add_copy(&mut self, lhs: &str, rhs: &str) {
        self.add(ConstraintKind::Copy, lhs, rhs);
    }

    /// lhs = *rhs
    pub fn add_load(&mut self, lhs: &str, rhs: &str) {
        self.add(ConstraintKind::Load, lhs, rhs);
    }

    /// *lhs = rhs
    pub fn add_store(&mut self, lhs: &str, rhs: &str) {
        self.add(ConstraintKind::Store, lhs, rhs);
    }

    /// Solve, then write the DOT dump if one is configured
    pub fn solve(&mut self) -> Result<AnalysisResult> {
        self.solver.solve();

        if let Some(path) = &self.config.dot_dump {
            let mut out = BufWriter::new(File::create(path)?);
            self.solver.write_dot(&mut out)?;
            out.flush()?;
            debug!("lcd: wrote constraint graph to {}", path.display());
        }

        Ok(AnalysisResult {
            stats: self.solver.stats().clone(),
            locations: self.interner.len(),
            dot_dump: self.config.dot_dump.clone(),
        })
    }

    /// May `a` alias `b`? Unknown names never alias anything but themselves.
    pub fn may_alias(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        match (self.interner.get(a), self.interner.get(b)) {
            (Some(a), Some(b)) => self.solver.alias(&a, &b),
            _ => false,
        }
    }

    /// Answer many alias queries in parallel
    pub fn may_alias_batch(&self, pairs: &[(&str, &str)]) -> Vec<bool> {
        let resolved: Vec<Option<(LocationId, LocationId)>> = pairs
            .iter()
            .map(|(a, b)| Some((self.interner.get(a)?, self.interner.get(b)?)))
            .collect();
        let known: Vec<(LocationId, LocationId)> = resolved.iter().flatten().copied().collect();
        let mut answers = self.solver.alias_batch(&known).into_iter();

        resolved
            .iter()
            .zip(pairs)
            .map(|(ids, (a, b))| match ids {
                Some(_) => answers.next().unwrap_or(false),
                None => a == b,
            })
            .collect()
    }

    /// Names `name` may point to
    pub fn points_to(&self, name: &str) -> Result<Vec<&str>> {
        let id = self
            .interner
            .get(name)
            .ok_or_else(|| PtaError::unknown_location(name))?;
        let pointees = self.solver.points_to(&id).unwrap_or_default();
        Ok(pointees
            .into_iter()
            .filter_map(|loc| self.interner.name(loc))
            .collect())
    }

    /// Check if two names were collapsed into one vertex
    pub fn same_vertex(&self, a: &str, b: &str) -> bool {
        match (self.interner.get(a), self.interner.get(b)) {
            (Some(a), Some(b)) => self.solver.same_vertex(&a, &b),
            _ => false,
        }
    }
}
