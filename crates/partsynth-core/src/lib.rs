//! Core contracts and helpers for partsynth.
//!
//! This crate defines the catalog and taxonomy types consumed by the sampling
//! engine, attribute-name normalization, and the error taxonomy shared across
//! the loader, the engine, and the CLI.

pub mod catalog;
pub mod error;
pub mod normalize;
pub mod taxonomy;
pub mod validation;

pub use catalog::{Catalog, CatalogIndex, ComponentRecord};
pub use error::{Error, Result};
pub use normalize::{component_key, component_name_from_stem, normalize_attribute};
pub use taxonomy::{ClassTaxonomyEntry, PairTable, Taxonomy, UnitConversionTable};
pub use validation::{TaxonomyWarning, validate_taxonomy};

/// Reserved sample key holding the resolved component class.
pub const CLASS_KEY: &str = "class";
/// Reserved sample key holding the component name.
pub const CATEGORY_KEY: &str = "category";
/// Reserved sample key holding an optional class alias.
pub const INPUT_CLASS_KEY: &str = "input class";

/// Keys that describe a sample rather than belong to it.
pub const METADATA_KEYS: &[&str] = &[CLASS_KEY, CATEGORY_KEY, INPUT_CLASS_KEY];
