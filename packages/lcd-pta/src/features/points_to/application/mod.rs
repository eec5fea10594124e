//! Application layer for Points-to Analysis
//!
//! - **PointsToAnalyzer**: string-named locations over the LCD solver

pub mod analyzer;

pub use analyzer::{AnalysisResult, PointsToAnalyzer};
