use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use partsynth_core::{
    CatalogIndex, Error, PairTable, Result, Taxonomy, component_name_from_stem,
};

use crate::adapter::Loader;
use crate::formats::{
    FileKind, expect_kind, file_kind, parse_catalog_records, parse_class_features,
    parse_dynamic_units, parse_numeric_fields, parse_pair_params,
};
use crate::options::LoadOptions;

/// Loader reading every table from a data directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    options: LoadOptions,
}

impl FsLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    fn catalog_file(&self, component: &str) -> PathBuf {
        self.options
            .catalog_path()
            .join(format!("{}.json", component.replace(' ', "_")))
    }
}

impl Loader for FsLoader {
    fn source(&self) -> String {
        self.options.data_dir.display().to_string()
    }

    fn load_taxonomy(&self) -> Result<Taxonomy> {
        let options = &self.options;

        let features: BTreeMap<String, BTreeMap<String, Vec<String>>> =
            read_json(&options.path(&options.class_features))?;
        let class_members: BTreeMap<String, Vec<String>> =
            read_json(&options.path(&options.class_info))?;
        let numeric: Vec<String> = read_json(&options.path(&options.numeric_fields))?;
        let units = read_json(&options.path(&options.dynamic_units))?;
        let pairs = read_pair_params(&options.path(&options.pair_params))?;

        let aliases_path = options.path(&options.class_aliases);
        let aliases: BTreeMap<String, Vec<String>> = if aliases_path.exists() {
            read_json(&aliases_path)?
        } else {
            debug!(path = %aliases_path.display(), "class alias table not found");
            BTreeMap::new()
        };

        let taxonomy = Taxonomy {
            classes: parse_class_features(features),
            class_members,
            aliases,
            numeric_fields: parse_numeric_fields(numeric),
            pairs,
            units: parse_dynamic_units(units)?,
        };

        info!(
            event = "taxonomy_loaded",
            classes = taxonomy.classes.len(),
            numeric_fields = taxonomy.numeric_fields.len(),
            pairs = taxonomy.pairs.len(),
            units = taxonomy.units.len(),
        );

        Ok(taxonomy)
    }

    fn list_components(&self) -> Result<Vec<String>> {
        let dir = self.options.catalog_path();
        let mut components = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if !matches!(file_kind(&path), Ok(FileKind::Json)) {
                debug!(path = %path.display(), "skipping non-catalog file");
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                components.push(component_name_from_stem(stem));
            }
        }
        components.sort();
        Ok(components)
    }

    fn load_catalog(&self, component: &str) -> Result<CatalogIndex> {
        let path = self.catalog_file(component);
        if !path.exists() {
            return Err(Error::UnknownComponent(component.to_string()));
        }
        let index = load_catalog_file(&path)?;
        debug!(
            component = %index.component,
            attributes = index.attribute_count(),
            "catalog loaded"
        );
        Ok(index)
    }
}

/// Load a single catalog file; the component name comes from the file stem.
pub fn load_catalog_file(path: &Path) -> Result<CatalogIndex> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::InvalidInputFormat(format!("invalid path: {}", path.display())))?;
    let records = parse_catalog_records(read_json(path)?)?;
    Ok(CatalogIndex::from_records(
        component_name_from_stem(stem),
        &records,
    ))
}

/// Read a pair-params text file.
pub fn read_pair_params(path: &Path) -> Result<PairTable> {
    expect_kind(path, FileKind::PairList)?;
    let text = std::fs::read_to_string(path)?;
    parse_pair_params(&text)
}

/// Read and deserialize a JSON table.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    expect_kind(path, FileKind::Json)?;
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|err| {
        Error::InvalidInputFormat(format!("{}: {err}", path.display()))
    })
}

