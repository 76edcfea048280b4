use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use types::StakeSchedule;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Settings read from the optional YAML config file.
///
/// ```yaml
/// database_url: golf.db
/// stakes: [15, 15, 20]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub database_url: Option<String>,
    pub stakes: StakeSchedule,
}

impl LedgerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        log::info!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// The config at `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.stakes, StakeSchedule::default());
    }

    #[test]
    fn test_custom_schedule() {
        let config =
            LedgerConfig::from_yaml_str("database_url: golf.db\nstakes: [10, 10, 10, 25]\n")
                .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("golf.db"));
        assert_eq!(config.stakes.stakes(), &[10.0, 10.0, 10.0, 25.0]);
    }

    #[test]
    fn test_rejects_non_positive_stake() {
        let err = LedgerConfig::from_yaml_str("stakes: [15, 0, 20]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = LedgerConfig::load(Path::new("/nonexistent/golf-ledger.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(LedgerConfig::load_or_default(None).is_ok());
    }
}
