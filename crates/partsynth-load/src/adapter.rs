use partsynth_core::{Catalog, CatalogIndex, Result, Taxonomy};

/// Trait implemented by sources that can provide catalogs and the class taxonomy.
pub trait Loader {
    /// Human-readable identifier of the source (e.g. a directory path).
    fn source(&self) -> String;

    /// Load every taxonomy table into one read-only value.
    fn load_taxonomy(&self) -> Result<Taxonomy>;

    /// Names of the components the source holds catalogs for, sorted.
    fn list_components(&self) -> Result<Vec<String>>;

    /// Load and index the catalog of one component.
    fn load_catalog(&self, component: &str) -> Result<CatalogIndex>;

    /// Load every component catalog.
    fn load_catalog_all(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        for component in self.list_components()? {
            catalog.insert(self.load_catalog(&component)?);
        }
        Ok(catalog)
    }
}
