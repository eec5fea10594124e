//! LCD solver configuration

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current YAML schema version
pub const CONFIG_VERSION: u32 = 1;

/// Upper bound for the capacity hint; vertex ids are `u32` and every vertex
/// owns three bit-sets sized by the vertex count.
const MAX_EXPECTED_LOCATIONS: usize = 1 << 28;

/// LCD solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Collapse copy cycles while solving (Lazy Cycle Detection)
    pub cycle_detection: bool,

    /// Capacity hint for vertices and identity maps
    pub expected_locations: usize,

    /// Write the solved graph in DOT format here (analyzer only)
    pub dot_dump: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cycle_detection: true,
            expected_locations: 1024,
            dot_dump: None,
        }
    }
}

/// On-disk layout: `version` next to the flattened settings
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFileV1 {
    version: u32,
    #[serde(flatten)]
    solver: SolverConfig,
}

impl SolverConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.expected_locations > MAX_EXPECTED_LOCATIONS {
            return Err(ConfigError::range_with_hint(
                "expected_locations",
                self.expected_locations,
                0,
                MAX_EXPECTED_LOCATIONS,
                "Capacity hint must fit the vertex id space",
            ));
        }

        if let Some(path) = &self.dot_dump {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "dot_dump must be a non-empty path or omitted".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Builder: Set cycle_detection
    pub fn cycle_detection(mut self, v: bool) -> Self {
        self.cycle_detection = v;
        self
    }

    /// Builder: Set expected_locations
    pub fn expected_locations(mut self, v: usize) -> Self {
        self.expected_locations = v;
        self
    }

    /// Builder: Set dot_dump
    pub fn dot_dump(mut self, v: Option<PathBuf>) -> Self {
        self.dot_dump = v;
        self
    }

    /// Parse a versioned YAML document and validate it
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        if file.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: vec![CONFIG_VERSION],
            });
        }

        file.solver.validate()?;
        Ok(file.solver)
    }

    /// Load a versioned YAML file and validate it
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as a versioned YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: CONFIG_VERSION,
            solver: self.clone(),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert!(config.cycle_detection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::default()
            .cycle_detection(false)
            .expected_locations(8)
            .dot_dump(Some(PathBuf::from("out.dot")));
        assert!(!config.cycle_detection);
        assert_eq!(config.expected_locations, 8);
        assert_eq!(config.dot_dump, Some(PathBuf::from("out.dot")));
    }

    #[test]
    fn test_capacity_out_of_range() {
        let config = SolverConfig::default().expected_locations(MAX_EXPECTED_LOCATIONS + 1);
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_empty_dump_path_rejected() {
        let config = SolverConfig::default().dot_dump(Some(PathBuf::new()));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_partial_document() {
        let config = SolverConfig::from_yaml_str("version: 1\ncycle_detection: false\n").unwrap();
        assert!(!config.cycle_detection);
        assert_eq!(config.expected_locations, 1024);
        assert_eq!(config.dot_dump, None);
    }

    #[test]
    fn test_yaml_wrong_version() {
        let err = SolverConfig::from_yaml_str("version: 2\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedVersion { found: 2, .. }
        ));
    }

    #[test]
    fn test_yaml_missing_version() {
        let err = SolverConfig::from_yaml_str("cycle_detection: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = SolverConfig::default()
            .expected_locations(77)
            .dot_dump(Some(PathBuf::from("graph.dot")));
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert_eq!(SolverConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
