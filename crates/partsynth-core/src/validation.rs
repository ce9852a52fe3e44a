use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::taxonomy::Taxonomy;

/// Non-fatal inconsistency between the taxonomy and the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyWarning {
    pub code: &'static str,
    pub message: String,
}

impl TaxonomyWarning {
    fn new(code: &'static str, message: String) -> Self {
        Self { code, message }
    }
}

/// Validate the taxonomy tables against the loaded catalog.
///
/// Fails on:
/// - pair entries mapping an attribute to itself
/// - class members listed under a class with no taxonomy entry while strict
///
/// Reports as warnings:
/// - catalog components no class claims
/// - necessary attributes a member component never carries
pub fn validate_taxonomy(
    taxonomy: &Taxonomy,
    catalog: &Catalog,
    strict: bool,
) -> Result<Vec<TaxonomyWarning>> {
    for (source, partner) in taxonomy.pairs.iter() {
        if source == partner {
            return Err(Error::InvalidData(format!(
                "pair maps '{source}' to itself"
            )));
        }
    }

    let mut warnings = Vec::new();

    for class in taxonomy.class_members.keys() {
        if taxonomy.taxonomy_of(class).is_none() {
            if strict {
                return Err(Error::InvalidData(format!(
                    "class '{class}' has members but no taxonomy entry"
                )));
            }
            warnings.push(TaxonomyWarning::new(
                "class_without_entry",
                format!("class '{class}' has members but no taxonomy entry"),
            ));
        }
    }

    for index in catalog.components.values() {
        let class = match taxonomy.class_of(&index.component) {
            Ok(class) => class,
            Err(_) => {
                warnings.push(TaxonomyWarning::new(
                    "unclassified_component",
                    format!("component '{}' has no class", index.component),
                ));
                continue;
            }
        };

        let Some(entry) = taxonomy.taxonomy_of(class) else {
            continue;
        };
        for attribute in entry.necessary() {
            if !index.contains(attribute) {
                warnings.push(TaxonomyWarning::new(
                    "missing_necessary_attribute",
                    format!(
                        "component '{}' never carries necessary attribute '{attribute}'",
                        index.component
                    ),
                ));
            }
        }
    }

    Ok(warnings)
}
