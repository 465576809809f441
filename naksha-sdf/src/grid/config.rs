//! Configuration types for the signed-distance-field map.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    /// Meters per cell edge (e.g., 0.5 = 50cm cells)
    pub resolution: f32,

    /// Initial grid width in vertices
    pub initial_width: usize,

    /// Initial grid height in vertices
    pub initial_height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 0.5,    // 50cm cells
            initial_width: 20,  // 10m at 50cm
            initial_height: 20, // 10m at 50cm
        }
    }
}

impl GridConfig {
    /// Create a configuration for a specific area size (in meters)
    pub fn for_area(width_m: f32, height_m: f32, resolution: f32) -> Self {
        Self {
            resolution,
            initial_width: (width_m / resolution) as usize,
            initial_height: (height_m / resolution) as usize,
        }
    }

    /// Calculate memory usage in bytes for the initial grid
    pub fn initial_memory_bytes(&self) -> usize {
        // Two f32 layers (distance + priority) per vertex
        self.initial_width * self.initial_height * 8
    }
}

/// Full map configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    /// Grid configuration (size, resolution)
    #[serde(default)]
    pub grid: GridConfig,

    /// Maximum radius around an observed cell in which vertices are
    /// updated (meters). Fixed for the map's lifetime.
    #[serde(default = "default_update_radius")]
    pub update_radius: f32,
}

fn default_update_radius() -> f32 {
    3.0
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            update_radius: default_update_radius(),
        }
    }
}

/// Configuration validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Cell resolution must be a positive length
    #[error("resolution must be positive, got {0}")]
    InvalidResolution(f32),

    /// Update radius must be a positive length
    #[error("update radius must be positive, got {0}")]
    InvalidUpdateRadius(f32),

    /// The initial grid must contain at least one vertex per axis
    #[error("initial grid extent must be nonzero, got {width}x{height}")]
    EmptyGrid {
        /// Configured initial width in vertices
        width: usize,
        /// Configured initial height in vertices
        height: usize,
    },
}

/// Errors that can occur when loading YAML configuration.
#[derive(Error, Debug)]
pub enum YamlConfigError {
    /// IO error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation failed.
    #[error("config validation error: {0}")]
    Validation(#[from] ConfigError),
}

impl MapConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid.resolution.is_finite() || self.grid.resolution <= 0.0 {
            return Err(ConfigError::InvalidResolution(self.grid.resolution));
        }
        if !self.update_radius.is_finite() || self.update_radius <= 0.0 {
            return Err(ConfigError::InvalidUpdateRadius(self.update_radius));
        }
        if self.grid.initial_width == 0 || self.grid.initial_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid.initial_width,
                height: self.grid.initial_height,
            });
        }
        Ok(())
    }

    /// Load configuration from a YAML file.
    ///
    /// Parses the file and validates the configuration.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, YamlConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, YamlConfigError> {
        let config: MapConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a YAML string.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), YamlConfigError> {
        let yaml = self.to_yaml_string()?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
