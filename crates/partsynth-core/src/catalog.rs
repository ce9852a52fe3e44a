use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_attribute;

/// One observed product record: attribute name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRecord {
    pub fields: BTreeMap<String, String>,
}

impl ComponentRecord {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for ComponentRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Observed values per attribute for one component.
///
/// Duplicates are retained so uniform draws follow observed frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub component: String,
    pub values: BTreeMap<String, Vec<String>>,
}

impl CatalogIndex {
    /// Build the index from raw records, normalizing attribute names once.
    pub fn from_records<'a, I>(component: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = &'a ComponentRecord>,
    {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in records {
            for (attribute, value) in &record.fields {
                values
                    .entry(normalize_attribute(attribute))
                    .or_default()
                    .push(value.clone());
            }
        }

        Self {
            component: component.into(),
            values,
        }
    }

    /// Observed values for an attribute; `None` when the component never carries it.
    pub fn values_of(&self, attribute: &str) -> Option<&[String]> {
        self.values
            .get(attribute)
            .map(Vec::as_slice)
            .filter(|values| !values.is_empty())
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.values_of(attribute).is_some()
    }

    /// Attribute names in deterministic (sorted) order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, _)| name.as_str())
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes().count()
    }
}

/// All component indexes keyed by component name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub components: BTreeMap<String, CatalogIndex>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: CatalogIndex) {
        self.components.insert(index.component.clone(), index);
    }

    pub fn component(&self, name: &str) -> Option<&CatalogIndex> {
        self.components.get(name)
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> ComponentRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn index_keeps_duplicates_and_normalizes_names() {
        let records = vec![
            record(&[("Type", "Active"), ("Voltage - Supply", "5V")]),
            record(&[("Type", "Active"), ("Voltage - Supply", "3.3V")]),
            record(&[("Type", "Passive")]),
        ];
        let index = CatalogIndex::from_records("Active Filters", &records);

        assert_eq!(
            index.values_of("Type"),
            Some(&["Active".to_string(), "Active".to_string(), "Passive".to_string()][..])
        );
        assert_eq!(index.values_of("VoltageSupply").map(|v| v.len()), Some(2));
        assert!(index.values_of("Voltage - Supply").is_none());
        assert_eq!(
            index.attributes().collect::<Vec<_>>(),
            vec!["Type", "VoltageSupply"]
        );
    }

    #[test]
    fn empty_value_lists_are_treated_as_absent() {
        let mut index = CatalogIndex::default();
        index.values.insert("Ghost".to_string(), Vec::new());
        assert!(!index.contains("Ghost"));
        assert_eq!(index.attribute_count(), 0);
    }
}
