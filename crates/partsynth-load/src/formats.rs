//! Parsers for the individual input tables.
//!
//! Every function here works on already-read content so it can be exercised
//! without touching the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::Value;

use partsynth_core::{
    ClassTaxonomyEntry, ComponentRecord, Error, PairTable, Result, UnitConversionTable,
    normalize_attribute,
};

/// Input file kinds the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    PairList,
}

/// Classify a file by extension.
pub fn file_kind(path: &Path) -> Result<FileKind> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("json") => Ok(FileKind::Json),
        Some("txt") => Ok(FileKind::PairList),
        _ => Err(Error::InvalidInputFormat(format!(
            "unrecognized file type: {}",
            path.display()
        ))),
    }
}

/// Require a specific file kind for a path.
pub fn expect_kind(path: &Path, expected: FileKind) -> Result<()> {
    let kind = file_kind(path)?;
    if kind != expected {
        return Err(Error::InvalidInputFormat(format!(
            "expected {expected:?} file, got {}",
            path.display()
        )));
    }
    Ok(())
}

/// Parse a catalog file: an array of flat objects.
pub fn parse_catalog_records(value: Value) -> Result<Vec<ComponentRecord>> {
    let Value::Array(items) = value else {
        return Err(Error::InvalidInputFormat(
            "catalog must be an array of records".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(Error::InvalidInputFormat(format!(
                "catalog record {position} is not an object"
            )));
        };

        let mut fields = BTreeMap::new();
        for (attribute, value) in map {
            let value = match value {
                Value::Null => continue,
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::InvalidInputFormat(format!(
                        "catalog record {position}: attribute '{attribute}' is not a scalar"
                    )));
                }
            };
            fields.insert(attribute, value);
        }
        records.push(ComponentRecord::new(fields));
    }

    Ok(records)
}

/// Build taxonomy entries from the class-features table.
pub fn parse_class_features(
    raw: BTreeMap<String, BTreeMap<String, Vec<String>>>,
) -> BTreeMap<String, ClassTaxonomyEntry> {
    raw.into_iter()
        .map(|(class, labels)| (class, ClassTaxonomyEntry::from_labels(labels)))
        .collect()
}

pub fn parse_numeric_fields(raw: Vec<String>) -> BTreeSet<String> {
    raw.iter().map(|name| normalize_attribute(name)).collect()
}

/// Build the unit table; multipliers may be strings or JSON numbers.
pub fn parse_dynamic_units(
    raw: BTreeMap<String, BTreeMap<String, Value>>,
) -> Result<UnitConversionTable> {
    let mut table = UnitConversionTable::new();
    for (base, alternates) in raw {
        for (alternate, multiplier) in alternates {
            let parsed = match &multiplier {
                Value::Number(number) => number.as_f64(),
                Value::String(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            }
            .ok_or_else(|| {
                Error::InvalidData(format!(
                    "multiplier for '{base}' -> '{alternate}' is not numeric: {multiplier}"
                ))
            })?;
            table.insert(base.clone(), alternate, parsed)?;
        }
    }
    Ok(table)
}

/// Parse the pair-params text format.
///
/// Blocks are separated by blank lines. Each block loses its whitespace,
/// hyphens and parentheses and must then split on `/` into exactly two names.
pub fn parse_pair_params(text: &str) -> Result<PairTable> {
    let mut table = PairTable::new();
    for (position, block) in split_blocks(text).into_iter().enumerate() {
        let stripped = normalize_attribute(&block);
        let parts: Vec<&str> = stripped.split('/').collect();
        match parts.as_slice() {
            [source, partner] if !source.is_empty() && !partner.is_empty() => {
                table.insert(*source, *partner);
            }
            _ => {
                return Err(Error::InvalidInputFormat(format!(
                    "pair block {position} does not name two attributes: {block:?}"
                )));
            }
        }
    }
    Ok(table)
}

fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
