use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use partsynth_generate::{GenerateOptions, SamplingOptions};
use partsynth_load::LoadOptions;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "partsynth.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `[run]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub seed: u64,
    pub samples_per_component: u32,
    pub out_dir: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        let defaults = GenerateOptions::default();
        Self {
            seed: defaults.seed,
            samples_per_component: defaults.samples_per_component,
            out_dir: defaults.out_dir,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data: LoadOptions,
    pub sampling: SamplingOptions,
    pub run: RunSettings,
}

impl CliConfig {
    pub fn generate_options(&self, components: Option<Vec<String>>) -> GenerateOptions {
        GenerateOptions {
            out_dir: self.run.out_dir.clone(),
            seed: self.run.seed,
            samples_per_component: self.run.samples_per_component,
            components,
            sampling: self.sampling.clone(),
        }
    }
}

/// Read the explicit config file, else `partsynth.toml` if present, else defaults.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(CliConfig::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Toml { path, source })
}

pub fn parse_config(content: &str) -> Result<CliConfig, toml::de::Error> {
    toml::from_str(content)
}
