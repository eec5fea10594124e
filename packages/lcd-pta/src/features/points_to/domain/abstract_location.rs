//! Abstract Locations
//!
//! The engine treats a location as an opaque identity token: it is hashed,
//! compared and cloned, never inspected. Clients pick the token type
//! (interned ids, arena indices, `&'static str` in tests).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Identity token for one program-level storage location
///
/// Blanket-implemented for every `Clone + Eq + Hash + Debug` type.
pub trait AbstractLocation: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> AbstractLocation for T {}

/// Interned location handle handed out by [`LocationInterner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc{}", self.0)
    }
}

/// Name → `LocationId` interner
///
/// The same name always yields the same id; distinct names never collide.
#[derive(Debug, Default, Clone)]
pub struct LocationInterner {
    ids: FxHashMap<String, LocationId>,
    names: Vec<String>,
}

impl LocationInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Intern a name, allocating a fresh id on first sight
    pub fn intern(&mut self, name: &str) -> LocationId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = LocationId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up a name without interning it
    #[inline]
    pub fn get(&self, name: &str) -> Option<LocationId> {
        self.ids.get(name).copied()
    }

    /// Name of an interned id
    #[inline]
    pub fn name(&self, id: LocationId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
