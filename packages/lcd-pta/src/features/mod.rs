//! Feature modules (vertical slices)

pub mod points_to;
