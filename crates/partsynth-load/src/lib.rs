//! Catalog and taxonomy loaders.

pub mod adapter;
pub mod formats;
pub mod fs;
pub mod options;

pub use adapter::Loader;
pub use fs::FsLoader;
pub use options::LoadOptions;

pub use partsynth_core::{Catalog, CatalogIndex, Taxonomy};
