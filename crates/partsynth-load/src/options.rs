use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the loader finds its input tables.
///
/// File names are relative to `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub data_dir: PathBuf,
    /// Directory holding one catalog file per component.
    pub catalog_dir: String,
    pub class_features: String,
    pub class_info: String,
    pub numeric_fields: String,
    pub dynamic_units: String,
    pub pair_params: String,
    /// Optional; a missing file means no class has aliases.
    pub class_aliases: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            catalog_dir: "formatData".to_string(),
            class_features: "class-features.json".to_string(),
            class_info: "class-info.json".to_string(),
            numeric_fields: "numeric-fields.json".to_string(),
            dynamic_units: "dynamic-units.json".to_string(),
            pair_params: "pair-params.txt".to_string(),
            class_aliases: "class-aliases.json".to_string(),
        }
    }
}

impl LoadOptions {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.data_dir.join(relative)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.path(&self.catalog_dir)
    }
}
