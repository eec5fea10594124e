//! Points-to Analysis Constraints
//!
//! Four inclusion constraints following Andersen's formulation:
//! - ADDRESS_OF: x = &y (or x = alloca) → pts(x) ⊇ {y}
//! - COPY:       x = y                  → pts(x) ⊇ pts(y)
//! - LOAD:       x = *y                 → ∀o ∈ pts(y): pts(x) ⊇ pts(o)
//! - STORE:      *x = y                 → ∀o ∈ pts(x): pts(o) ⊇ pts(y)

use crate::errors::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Constraint types for points-to analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Copy constraint: x = y
    Copy,

    /// Load constraint: x = *y
    Load,

    /// Store constraint: *x = y
    Store,

    /// Base constraint: x = &y
    /// The location y itself (not its points-to set) joins pts(x)
    AddressOf,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Copy => "COPY",
            ConstraintKind::Load => "LOAD",
            ConstraintKind::Store => "STORE",
            ConstraintKind::AddressOf => "ADDRESS_OF",
        }
    }
}

/// A single inclusion constraint between two locations
///
/// Immutable once built; the solver only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint<L> {
    kind: ConstraintKind,
    lhs: L,
    rhs: L,
}

impl<L> Constraint<L> {
    #[inline]
    pub fn new(kind: ConstraintKind, lhs: L, rhs: L) -> Self {
        Self { kind, lhs, rhs }
    }

    /// x = &y
    #[inline]
    pub fn address_of(lhs: L, rhs: L) -> Self {
        Self::new(ConstraintKind::AddressOf, lhs, rhs)
    }

    /// x = y
    #[inline]
    pub fn copy(lhs: L, rhs: L) -> Self {
        Self::new(ConstraintKind::Copy, lhs, rhs)
    }

    /// x = *y
    #[inline]
    pub fn load(lhs: L, rhs: L) -> Self {
        Self::new(ConstraintKind::Load, lhs, rhs)
    }

    /// *x = y
    #[inline]
    pub fn store(lhs: L, rhs: L) -> Self {
        Self::new(ConstraintKind::Store, lhs, rhs)
    }

    #[inline]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Left-hand side (the assigned side)
    #[inline]
    pub fn lhs(&self) -> &L {
        &self.lhs
    }

    /// Right-hand side
    #[inline]
    pub fn rhs(&self) -> &L {
        &self.rhs
    }

    /// Check if this is a complex constraint (LOAD or STORE)
    #[inline]
    pub fn is_complex(&self) -> bool {
        matches!(self.kind, ConstraintKind::Load | ConstraintKind::Store)
    }

    /// Split into (kind, lhs, rhs)
    #[inline]
    pub fn into_parts(self) -> (ConstraintKind, L, L) {
        (self.kind, self.lhs, self.rhs)
    }
}

/// Constraint set with statistics
///
/// Serializable so a front end can dump what it produced and a test or
/// benchmark can replay it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize",
    deserialize = "L: Deserialize<'de>"
))]
pub struct ConstraintSet<L> {
    /// All constraints, in insertion order
    constraints: Vec<Constraint<L>>,

    /// Statistics
    pub address_of_count: usize,
    pub copy_count: usize,
    pub load_count: usize,
    pub store_count: usize,
}

impl<L> Default for ConstraintSet<L> {
    fn default() -> Self {
        Self {
            constraints: Vec::new(),
            address_of_count: 0,
            copy_count: 0,
            load_count: 0,
            store_count: 0,
        }
    }
}

impl<L> ConstraintSet<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            constraints: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Add a constraint and update statistics
    pub fn add(&mut self, constraint: Constraint<L>) {
        match constraint.kind {
            ConstraintKind::AddressOf => self.address_of_count += 1,
            ConstraintKind::Copy => self.copy_count += 1,
            ConstraintKind::Load => self.load_count += 1,
            ConstraintKind::Store => self.store_count += 1,
        }
        self.constraints.push(constraint);
    }

    /// Total number of constraints
    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Constraint<L>> {
        self.constraints.iter()
    }

    /// Get constraints by kind
    pub fn by_kind(&self, kind: ConstraintKind) -> impl Iterator<Item = &Constraint<L>> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    /// Get complex constraints (LOAD + STORE)
    pub fn complex(&self) -> impl Iterator<Item = &Constraint<L>> {
        self.constraints.iter().filter(|c| c.is_complex())
    }
}

impl<L: Serialize> ConstraintSet<L> {
    /// Dump as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<L: DeserializeOwned> ConstraintSet<L> {
    /// Replay a JSON dump
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<L> Extend<Constraint<L>> for ConstraintSet<L> {
    fn extend<I: IntoIterator<Item = Constraint<L>>>(&mut self, iter: I) {
        for c in iter {
            self.add(c);
        }
    }
}

impl<L> FromIterator<Constraint<L>> for ConstraintSet<L> {
    fn from_iter<I: IntoIterator<Item = Constraint<L>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<L> IntoIterator for ConstraintSet<L> {
    type Item = Constraint<L>;
    type IntoIter = std::vec::IntoIter<Constraint<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.into_iter()
    }
}
