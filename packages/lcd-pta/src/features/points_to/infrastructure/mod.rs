//! Infrastructure layer for Points-to Analysis
//!
//! Algorithm implementations behind the solver port:
//! - **BitVector**: growable points-to / load / store rows
//! - **Graph**: tombstoned constraint graph with stable handles
//! - **DepthFirst**: path-tracking DFS for cycle capture and alias queries
//! - **LcdSolver**: Andersen worklist + Lazy Cycle Detection

pub mod bit_vector;
pub mod depth_first;
pub mod graph;
pub mod lcd_solver;

pub use bit_vector::BitVector;
pub use depth_first::DepthFirst;
pub use graph::{EdgeId, Graph, NodeId};
pub use lcd_solver::{LcdSolver, LcdStats};
