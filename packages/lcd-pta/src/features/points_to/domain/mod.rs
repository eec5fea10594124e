//! Domain models for Points-to Analysis
//!
//! Core abstractions independent of the solving algorithm:
//! - AbstractLocation: opaque client identity token
//! - Constraint: inclusion constraints (ADDRESS_OF, COPY, LOAD, STORE)

pub mod abstract_location;
pub mod constraint;

pub use abstract_location::{AbstractLocation, LocationId, LocationInterner};
pub use constraint::{Constraint, ConstraintKind, ConstraintSet};
