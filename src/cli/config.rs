//! Configuration management for tetrate
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.tetrate/config.toml

use crate::errors::{Result, TetrationError};
use crate::report::NumberFormat;
use crate::solver::SolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for tetrate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

/// Output and batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Result format when `--format` is not given
    pub format: NumberFormat,
    /// Printed digits; 0 derives them from the precision
    pub digits: usize,
    pub color_output: bool,
    /// Concurrent sweep solves; 0 means one per CPU
    pub max_parallel: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: NumberFormat::Scientific,
            digits: 0,
            color_output: true,
            max_parallel: 0,
        }
    }
}

impl OutputConfig {
    /// Digits to print at `bits`, with an explicit request taking priority
    pub fn digits_for(&self, requested: Option<usize>, bits: u32) -> usize {
        let digits = match requested.or(Some(self.digits).filter(|d| *d > 0)) {
            Some(d) => d.max(1),
            None => crate::numeric::display_digits(bits),
        };
        digits.min(crate::numeric::MAX_DISPLAY_DIGITS)
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TetrationError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| TetrationError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.tetrate/config.toml, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".tetrate").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.solver.validate().map_err(TetrationError::ConfigError)?;

        if self.output.digits > 1 << 20 {
            return Err(TetrationError::ConfigError(format!(
                "output digits must not exceed {}",
                1 << 20
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TetrationError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TetrationError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TetrationError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render as TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TetrationError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.solver.max_depth, 2000);
        assert_eq!(config.output.format, NumberFormat::Scientific);
        assert_eq!(config.output.max_parallel, 0);
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_depth_bounds() {
        let mut config = Config::default();
        config.solver.min_depth = 3000;
        assert!(matches!(
            config.validate(),
            Err(TetrationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_validation_digits() {
        let mut config = Config::default();
        config.output.digits = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.solver.inversion_step_limit = 120;
        config.output.format = NumberFormat::Fixed;
        config.output.digits = 30;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"fixed\"\n").unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.output.format, NumberFormat::Fixed);
        assert_eq!(loaded.solver, SolverConfig::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[solver]\nnewton_step_limit = 0\n").unwrap();
        assert!(Config::load_from_file(&path).is_err());

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load_from_file(&temp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_digits_for() {
        let output = OutputConfig::default();
        assert_eq!(output.digits_for(None, 2048), 611);
        assert_eq!(output.digits_for(Some(12), 2048), 12);
        assert_eq!(output.digits_for(Some(0), 2048), 1);

        let fixed = OutputConfig {
            digits: 40,
            ..OutputConfig::default()
        };
        assert_eq!(fixed.digits_for(None, 2048), 40);
    }

    #[test]
    fn test_digits_for_is_capped() {
        let output = OutputConfig::default();
        assert_eq!(
            output.digits_for(Some(usize::MAX), 128),
            crate::numeric::MAX_DISPLAY_DIGITS
        );

        let huge = OutputConfig {
            digits: 1 << 40,
            ..OutputConfig::default()
        };
        assert_eq!(huge.digits_for(None, 128), crate::numeric::MAX_DISPLAY_DIGITS);
    }
}
