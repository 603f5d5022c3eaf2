//! Configuration types for nwalign

use crate::NwError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentConfig {
    #[serde(default = "default_gap_open")]
    pub gap_open: f64,
    #[serde(default = "default_gap_extend")]
    pub gap_extend: f64,
    /// Bundled matrix name (e.g. "BLOSUM62") or a path to a matrix table
    #[serde(default = "default_matrix")]
    pub matrix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions
fn default_gap_open() -> f64 { -10.0 }
fn default_gap_extend() -> f64 { -1.0 }
fn default_matrix() -> String { "BLOSUM62".to_string() }
fn default_format() -> String { "text".to_string() }

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            gap_open: default_gap_open(),
            gap_extend: default_gap_extend(),
            matrix: default_matrix(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Reject values that could never drive an alignment.
    pub fn validate(&self) -> Result<(), NwError> {
        check_penalty("gap_open", self.alignment.gap_open)?;
        check_penalty("gap_extend", self.alignment.gap_extend)?;

        if self.alignment.matrix.trim().is_empty() {
            return Err(NwError::Configuration(
                "alignment.matrix must name a matrix or a file".to_string(),
            ));
        }

        match self.output.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(NwError::Configuration(format!(
                "Unknown output format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

/// Gap penalties must be finite and strictly negative.
pub fn check_penalty(name: &str, value: f64) -> Result<(), NwError> {
    if !value.is_finite() || value >= 0.0 {
        return Err(NwError::InvalidParameter(format!(
            "{} must be a negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, NwError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| NwError::Configuration(format!("Failed to parse config: {}", e)))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), NwError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| NwError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.alignment.gap_open, -10.0);
        assert_eq!(config.alignment.gap_extend, -1.0);
        assert_eq!(config.alignment.matrix, "BLOSUM62");
        assert_eq!(config.output.format, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let toml_content = r#"
[alignment]
gap_open = -11.0
gap_extend = -0.5
matrix = "matrices/PAM250.mat"

[output]
format = "json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.alignment.gap_open, -11.0);
        assert_eq!(config.alignment.gap_extend, -0.5);
        assert_eq!(config.alignment.matrix, "matrices/PAM250.mat");
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[alignment]\ngap_open = -12.0\n").unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.alignment.gap_open, -12.0);
        assert_eq!(config.alignment.gap_extend, -1.0);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[alignment\ngap_open = ").unwrap();

        match load_config(temp_file.path()) {
            Err(NwError::Configuration(msg)) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/nwalign.toml");
        assert!(matches!(result, Err(NwError::Io(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let mut config = Config::default();
        config.alignment.gap_open = -8.0;
        config.output.format = "json".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(temp_file.path(), &config).unwrap();
        let reloaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, reloaded);
    }

    #[test]
    fn test_validate_rejects_non_negative_penalties() {
        let mut config = Config::default();
        config.alignment.gap_open = 10.0;
        assert!(matches!(
            config.validate(),
            Err(NwError::InvalidParameter(_))
        ));

        let mut config = Config::default();
        config.alignment.gap_extend = 0.0;
        assert!(matches!(
            config.validate(),
            Err(NwError::InvalidParameter(_))
        ));

        let mut config = Config::default();
        config.alignment.gap_extend = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(NwError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_format() {
        let mut config = Config::default();
        config.output.format = "xml".to_string();
        assert!(matches!(config.validate(), Err(NwError::Configuration(_))));
    }
}
