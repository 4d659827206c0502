//! Configuration types and management for bricklens.
//!
//! Every tunable the engines consume lives here, grouped into one section
//! struct per concern. The engines take these sections by reference; nothing
//! in the core reads process-wide constants.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{BricklensError, Result};

/// Main configuration for the bricklens engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BricklensConfig {
    /// Catalog ingestion bounds
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Derived-field parameters (build-hours estimate)
    #[serde(default)]
    pub derived: DerivedFieldsConfig,

    /// Clustering engine settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Statistics engine settings
    #[serde(default)]
    pub statistics: StatisticsConfig,

    /// Preference synthesis settings
    #[serde(default)]
    pub preferences: PreferenceConfig,
}

impl Default for BricklensConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            derived: DerivedFieldsConfig::default(),
            clustering: ClusteringConfig::default(),
            statistics: StatisticsConfig::default(),
            preferences: PreferenceConfig::default(),
        }
    }
}

impl BricklensConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            BricklensError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            BricklensError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;
        self.derived.validate()?;
        self.clustering.validate()?;
        self.statistics.validate()?;
        self.preferences.validate()?;
        Ok(())
    }
}

/// Catalog ingestion bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Earliest accepted release year
    pub min_year: i32,

    /// Latest accepted release year
    pub max_year: i32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            min_year: 2000,
            max_year: 2025,
        }
    }
}

impl CatalogConfig {
    /// Validate the catalog configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_year > self.max_year {
            return Err(BricklensError::config_field(
                format!(
                    "min_year {} must not exceed max_year {}",
                    self.min_year, self.max_year
                ),
                "catalog.min_year",
            ));
        }
        Ok(())
    }
}

/// Parameters for derived record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFieldsConfig {
    /// Pieces assembled per estimated build hour
    pub build_hours_divisor: f64,

    /// Sets below this piece count report zero build hours
    pub min_pieces_for_build_hours: u32,
}

impl Default for DerivedFieldsConfig {
    fn default() -> Self {
        Self {
            build_hours_divisor: 250.0,
            min_pieces_for_build_hours: 10,
        }
    }
}

impl DerivedFieldsConfig {
    /// Validate the derived-fields configuration
    pub fn validate(&self) -> Result<()> {
        if self.build_hours_divisor <= 0.0 {
            return Err(BricklensError::config_field(
                "build_hours_divisor must be positive",
                "derived.build_hours_divisor",
            ));
        }
        Ok(())
    }
}

/// Clustering engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Target number of sets per cluster; cluster count is derived as
    /// `max(1, pool_size / items_per_cluster)`
    pub items_per_cluster: usize,

    /// Seed for k-means initialization; repeated runs on an unchanged pool
    /// produce identical labels
    pub seed: u64,

    /// Maximum Lloyd iterations before accepting the current partition
    pub max_iterations: usize,

    /// Convergence threshold on the inertia delta between iterations
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            items_per_cluster: 3,
            seed: 42,
            max_iterations: 100,
            tolerance: 1e-4,
        }
    }
}

impl ClusteringConfig {
    /// Validate the clustering configuration
    pub fn validate(&self) -> Result<()> {
        if self.items_per_cluster == 0 {
            return Err(BricklensError::config_field(
                "items_per_cluster must be at least 1",
                "clustering.items_per_cluster",
            ));
        }
        if self.max_iterations == 0 {
            return Err(BricklensError::config_field(
                "max_iterations must be at least 1",
                "clustering.max_iterations",
            ));
        }
        if self.tolerance <= 0.0 || !self.tolerance.is_finite() {
            return Err(BricklensError::config_field(
                "tolerance must be positive and finite",
                "clustering.tolerance",
            ));
        }
        Ok(())
    }
}

/// Statistics engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Two-sided confidence level for the Student's-t interval
    pub confidence_level: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl StatisticsConfig {
    /// Validate the statistics configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(BricklensError::config_field(
                format!(
                    "confidence_level must be in (0, 1), got {}",
                    self.confidence_level
                ),
                "statistics.confidence_level",
            ));
        }
        Ok(())
    }
}

/// Preference synthesis settings.
///
/// The price-to-pieces relation is an empirically fitted constant with no
/// documented derivation; it is preserved verbatim as a tunable default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceConfig {
    /// Intercept of the fitted price-to-pieces linear relation
    pub pieces_intercept: f64,

    /// Slope of the fitted price-to-pieces linear relation
    pub pieces_slope: f64,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            pieces_intercept: -19.079,
            pieces_slope: 9.288,
        }
    }
}

impl PreferenceConfig {
    /// Validate the preference configuration
    pub fn validate(&self) -> Result<()> {
        if !self.pieces_intercept.is_finite() || !self.pieces_slope.is_finite() {
            return Err(BricklensError::config_field(
                "price-to-pieces coefficients must be finite",
                "preferences",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BricklensConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = BricklensConfig::default();
        assert_eq!(config.catalog.min_year, 2000);
        assert_eq!(config.catalog.max_year, 2025);
        assert_eq!(config.clustering.items_per_cluster, 3);
        assert_eq!(config.clustering.seed, 42);
        assert_eq!(config.statistics.confidence_level, 0.95);
        assert_eq!(config.derived.build_hours_divisor, 250.0);
        assert_eq!(config.derived.min_pieces_for_build_hours, 10);
        assert_eq!(config.preferences.pieces_intercept, -19.079);
        assert_eq!(config.preferences.pieces_slope, 9.288);
    }

    #[test]
    fn test_invalid_items_per_cluster() {
        let mut config = BricklensConfig::default();
        config.clustering.items_per_cluster = 0;
        let err = config.validate().unwrap_err();
        match err {
            BricklensError::Config { field, .. } => {
                assert_eq!(field.as_deref(), Some("clustering.items_per_cluster"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_confidence_level() {
        let mut config = BricklensConfig::default();
        config.statistics.confidence_level = 1.0;
        assert!(config.validate().is_err());

        config.statistics.confidence_level = 0.0;
        assert!(config.validate().is_err());

        config.statistics.confidence_level = 0.99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_year_bounds() {
        let mut config = BricklensConfig::default();
        config.catalog.min_year = 2030;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bricklens.yml");

        let mut config = BricklensConfig::default();
        config.clustering.items_per_cluster = 5;
        config.statistics.confidence_level = 0.9;

        config.to_yaml_file(&path).unwrap();
        let loaded = BricklensConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "clustering:\n  items_per_cluster: 4\n  seed: 7\n  max_iterations: 50\n  tolerance: 0.001\n";
        let config: BricklensConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.clustering.items_per_cluster, 4);
        assert_eq!(config.clustering.seed, 7);
        // Unspecified sections fall back to defaults
        assert_eq!(config.statistics.confidence_level, 0.95);
        assert_eq!(config.catalog.max_year, 2025);
    }
}
