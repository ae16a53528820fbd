//! Configuration system

pub use serde::{Serialize, Deserialize};

use crate::spatial::extents::CELL_SIZE;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;
        
        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
    
    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    
    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Collision Configuration
///
/// Grid layout and diagnostics settings for a collision world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of one grid cell in world units
    pub cell_size: f64,
    /// Log a warning when a single actor covers more cells than this
    pub warn_cells_per_actor: usize,
    /// Log filter used by [`crate::foundation::logging::init_with_filter`]
    pub log_filter: String,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            warn_cells_per_actor: 512,
            log_filter: "warn".to_string(),
        }
    }
}

impl CollisionConfig {
    /// Set the grid cell size
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the per-actor cell count warning threshold
    pub fn with_warn_cells_per_actor(mut self, cells: usize) -> Self {
        self.warn_cells_per_actor = cells;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cell size must be a positive finite number, got {}",
                self.cell_size
            )));
        }

        if self.warn_cells_per_actor == 0 {
            return Err(ConfigError::Invalid(
                "cell warning threshold must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config for CollisionConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("collision_hash_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_is_valid() {
        let config = CollisionConfig::default();
        assert_eq!(config.cell_size, 256.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        for bad in [0.0, -16.0, f64::NAN, f64::INFINITY] {
            let config = CollisionConfig::default().with_cell_size(bad);
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
        let config = CollisionConfig::default().with_warn_cells_per_actor(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("config.toml");
        let config = CollisionConfig::default()
            .with_cell_size(128.0)
            .with_warn_cells_per_actor(64);
        config.save_to_file(&path).unwrap();

        let loaded = CollisionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("config.ron");
        let config = CollisionConfig::default().with_cell_size(512.0);
        config.save_to_file(&path).unwrap();

        let loaded = CollisionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "cell_size = 64.0\n").unwrap();

        let loaded = CollisionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.cell_size, 64.0);
        assert_eq!(loaded.warn_cells_per_actor, 512);
    }

    #[test]
    fn test_unsupported_format() {
        let result = CollisionConfig::default().save_to_file("collision.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
