use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::{component_key, normalize_attribute};

/// Label of the mandatory attribute tier in the class-features table.
pub const NECESSARY_LABEL: &str = "necessary";
/// Label of the prioritized attribute tier in the class-features table.
pub const MOST_RELEVANT_LABEL: &str = "Most Relevant";

/// Attribute tiers for one component class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTaxonomyEntry {
    /// Attributes every sample of the class must include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub necessary: Option<Vec<String>>,
    /// Attributes prioritized for inclusion.
    #[serde(default)]
    pub most_relevant: Vec<String>,
    /// Descriptive labels the sampler does not use.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_labels: BTreeMap<String, Vec<String>>,
}

impl ClassTaxonomyEntry {
    /// Build an entry from the raw label table, normalizing attribute names.
    pub fn from_labels(labels: BTreeMap<String, Vec<String>>) -> Self {
        let mut entry = Self::default();
        for (label, attributes) in labels {
            let attributes: Vec<String> =
                attributes.iter().map(|name| normalize_attribute(name)).collect();
            match label.as_str() {
                NECESSARY_LABEL => entry.necessary = Some(attributes),
                MOST_RELEVANT_LABEL => entry.most_relevant = attributes,
                _ => {
                    entry.other_labels.insert(label, attributes);
                }
            }
        }
        entry
    }

    pub fn necessary(&self) -> &[String] {
        self.necessary.as_deref().unwrap_or(&[])
    }
}

/// Correlated attribute pairs, looked up in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairTable {
    forward: BTreeMap<String, String>,
    inverse: BTreeMap<String, String>,
}

impl PairTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `source -> partner`. A repeated source keeps the latest partner.
    pub fn insert(&mut self, source: impl Into<String>, partner: impl Into<String>) {
        let source = source.into();
        let partner = partner.into();
        if let Some(previous) = self.forward.insert(source.clone(), partner.clone()) {
            self.inverse.remove(&previous);
        }
        self.inverse.insert(partner, source);
    }

    /// Partner of an attribute that appears as a key.
    pub fn partner_of(&self, attribute: &str) -> Option<&str> {
        self.forward.get(attribute).map(String::as_str)
    }

    /// Attribute that maps to the given one.
    pub fn source_of(&self, attribute: &str) -> Option<&str> {
        self.inverse.get(attribute).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward
            .iter()
            .map(|(source, partner)| (source.as_str(), partner.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PairTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (source, partner) in iter {
            table.insert(source, partner);
        }
        table
    }
}

/// Per base unit, the alternate units and their scale multipliers.
///
/// A multiplier below 1 means the alternate unit is larger than the base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitConversionTable {
    units: BTreeMap<String, BTreeMap<String, f64>>,
}

impl UnitConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        base: impl Into<String>,
        alternate: impl Into<String>,
        multiplier: f64,
    ) -> Result<()> {
        let base = base.into();
        let alternate = alternate.into();
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(Error::InvalidData(format!(
                "multiplier for '{base}' -> '{alternate}' must be a positive number, got {multiplier}"
            )));
        }
        self.units
            .entry(base)
            .or_default()
            .insert(alternate, multiplier);
        Ok(())
    }

    /// Alternate units for a base unit, if it has any.
    pub fn alternates(&self, unit: &str) -> Option<&BTreeMap<String, f64>> {
        self.units.get(unit).filter(|entries| !entries.is_empty())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Read-only class taxonomy and the lookup tables the sampler consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    pub classes: BTreeMap<String, ClassTaxonomyEntry>,
    /// Component names belonging to each class.
    pub class_members: BTreeMap<String, Vec<String>>,
    /// Alternate display names per class.
    pub aliases: BTreeMap<String, Vec<String>>,
    pub numeric_fields: BTreeSet<String>,
    pub pairs: PairTable,
    pub units: UnitConversionTable,
}

impl Taxonomy {
    /// Resolve the class of a component; the first class (in name order) that lists it wins.
    pub fn class_of(&self, component: &str) -> Result<&str> {
        let wanted = component_key(component);
        self.class_members
            .iter()
            .find(|(_, members)| members.iter().any(|member| component_key(member) == wanted))
            .map(|(class, _)| class.as_str())
            .ok_or_else(|| Error::UnknownComponent(component.to_string()))
    }

    pub fn taxonomy_of(&self, class: &str) -> Option<&ClassTaxonomyEntry> {
        self.classes.get(class)
    }

    pub fn aliases_of(&self, class: &str) -> &[String] {
        self.aliases.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_numeric(&self, attribute: &str) -> bool {
        self.numeric_fields.contains(attribute)
    }
}
