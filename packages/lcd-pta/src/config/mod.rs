//! Solver Configuration
//!
//! A single flat configuration for the LCD engine:
//! - Level 1: `SolverConfig::default()` - LCD on, no dumps
//! - Level 2: Builder setters - `SolverConfig::default().cycle_detection(false)`
//! - Level 3: Versioned YAML file
//!
//! # Examples
//!
//! ```rust,ignore
//! use lcd_pta::config::SolverConfig;
//!
//! let config = SolverConfig::default()
//!     .expected_locations(50_000)
//!     .dot_dump(Some("solved.dot".into()));
//! config.validate()?;
//!
//! let config = SolverConfig::from_yaml_file("pta.yaml")?;
//! ```

pub mod error;
pub mod solver_config;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use solver_config::{SolverConfig, CONFIG_VERSION};
