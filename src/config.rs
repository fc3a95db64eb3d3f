//! Optional TOML configuration for the CLI

use crate::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SymdexConfig {
    /// Worker pool size for the indexing pipeline
    pub workers: Option<usize>,
    /// Extra gitignore-style patterns excluded from discovery
    pub exclude: Option<Vec<String>>,
}

impl SymdexConfig {
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            workers: self.workers.unwrap_or(defaults.workers),
            extra_excludes: self.exclude.clone().unwrap_or_default(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("symdex.toml")
}

/// Load the config file if it exists; an absent file is not an error.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SymdexConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SymdexConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = SymdexConfig::default().engine_config();
        assert_eq!(config.workers, 4);
        assert!(config.extra_excludes.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let config: SymdexConfig =
            toml::from_str("workers = 8\nexclude = [\"gen/\"]").unwrap();
        let engine_config = config.engine_config();
        assert_eq!(engine_config.workers, 8);
        assert_eq!(engine_config.extra_excludes, vec!["gen/".to_string()]);
    }
}
