//! Tiered attribute selection.
//!
//! Selection runs tier by tier (necessary, most relevant, general) so that
//! pair expansion of an earlier tier can shrink the pool of a later one.

use std::collections::BTreeSet;

use partsynth_core::{CatalogIndex, ClassTaxonomyEntry, Error};

use crate::errors::SamplingError;
use crate::model::{SamplingOptions, SizeMode};
use crate::rng::RandomSource;
use crate::sample::Sample;

/// Attribute tier, in sampling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Necessary,
    MostRelevant,
    General,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Necessary => "necessary",
            Tier::MostRelevant => "most_relevant",
            Tier::General => "general",
        }
    }
}

/// Slot counts for the sampled tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierQuotas {
    /// Target size left after the necessary tier.
    pub remaining: usize,
    pub most_relevant: usize,
    pub general: usize,
}

/// Picks attribute names for one sample of one component.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSelector<'a> {
    entry: &'a ClassTaxonomyEntry,
    index: &'a CatalogIndex,
    options: &'a SamplingOptions,
}

impl<'a> FeatureSelector<'a> {
    pub fn new(
        entry: &'a ClassTaxonomyEntry,
        index: &'a CatalogIndex,
        options: &'a SamplingOptions,
    ) -> Self {
        Self {
            entry,
            index,
            options,
        }
    }

    /// Mandatory attributes the catalog carries, deduplicated, in taxonomy order.
    ///
    /// A necessary attribute the component never carries is an error in strict
    /// mode and is otherwise left out.
    pub fn necessary(&self) -> Result<Vec<String>, SamplingError> {
        let mut seen = BTreeSet::new();
        let mut chosen = Vec::new();
        for attribute in self.entry.necessary() {
            if !seen.insert(attribute.as_str()) {
                continue;
            }
            if self.index.contains(attribute) {
                chosen.push(attribute.clone());
            } else if self.options.strict {
                return Err(Error::EmptyPool(format!(
                    "component '{}' has no values for necessary attribute '{attribute}'",
                    self.index.component
                ))
                .into());
            }
        }
        Ok(chosen)
    }

    /// Draw the target size and split it across the sampled tiers.
    pub fn quotas<R: RandomSource>(&self, necessary: &[String], rng: &mut R) -> TierQuotas {
        let target = match self.options.size_mode {
            SizeMode::Fraction { p } => (self.index.attribute_count() as f64 * p).round() as usize,
            SizeMode::Range { min, max } => rng.range_inclusive(min, max) as usize,
        };

        let remaining = if necessary.is_empty() {
            target
        } else {
            target.saturating_sub(necessary.len()).max(1)
        };

        let necessary_relevant = necessary
            .iter()
            .filter(|attribute| self.entry.most_relevant.contains(*attribute))
            .count();
        let most_relevant = ((remaining as f64 * self.options.most_relevant_p).floor() as usize)
            .saturating_sub(necessary_relevant);

        TierQuotas {
            remaining,
            most_relevant,
            general: remaining.saturating_sub(most_relevant),
        }
    }

    /// Most-relevant attributes present in the catalog and not yet in the sample.
    pub fn most_relevant_pool(&self, sample: &Sample) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.entry
            .most_relevant
            .iter()
            .filter(|attribute| self.index.contains(attribute))
            .filter(|attribute| !sample.contains_key(attribute))
            .filter(|attribute| seen.insert(attribute.as_str()))
            .cloned()
            .collect()
    }

    /// Catalog attributes outside the most-relevant and necessary lists.
    ///
    /// Partners pulled in by pair expansion stay in this pool.
    pub fn general_pool(&self) -> Vec<String> {
        self.index
            .attributes()
            .filter(|attribute| {
                !self
                    .entry
                    .most_relevant
                    .iter()
                    .chain(self.entry.necessary())
                    .any(|name| name.as_str() == *attribute)
            })
            .map(str::to_string)
            .collect()
    }

    pub fn draw_most_relevant<R: RandomSource>(
        &self,
        quota: usize,
        sample: &Sample,
        rng: &mut R,
    ) -> Result<Vec<String>, SamplingError> {
        let pool = self.most_relevant_pool(sample);
        self.draw(Tier::MostRelevant, &pool, quota, rng)
    }

    pub fn draw_general<R: RandomSource>(
        &self,
        quota: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, SamplingError> {
        let pool = self.general_pool();
        self.draw(Tier::General, &pool, quota, rng)
    }

    fn draw<R: RandomSource>(
        &self,
        tier: Tier,
        pool: &[String],
        quota: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, SamplingError> {
        if quota == 0 {
            return Ok(Vec::new());
        }
        if pool.is_empty() {
            if self.options.strict {
                return Err(Error::EmptyPool(format!(
                    "{} pool of component '{}' is empty",
                    tier.as_str(),
                    self.index.component
                ))
                .into());
            }
            return Ok(Vec::new());
        }
        Ok(rng.sample_distinct(pool, quota))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use partsynth_core::ComponentRecord;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::rng::ScriptedSource;

    fn index(attributes: &[&str]) -> CatalogIndex {
        let record: ComponentRecord = attributes.iter().map(|name| (*name, "1")).collect();
        CatalogIndex::from_records("Active Filters", [&record])
    }

    fn entry(necessary: &[&str], most_relevant: &[&str]) -> ClassTaxonomyEntry {
        let mut labels = BTreeMap::new();
        if !necessary.is_empty() {
            labels.insert(
                "necessary".to_string(),
                necessary.iter().map(|name| name.to_string()).collect(),
            );
        }
        labels.insert(
            "Most Relevant".to_string(),
            most_relevant.iter().map(|name| name.to_string()).collect(),
        );
        ClassTaxonomyEntry::from_labels(labels)
    }

    #[test]
    fn fraction_mode_rounds_and_reserves_necessary() {
        let index = index(&["A", "B", "C", "D", "E", "Type"]);
        let entry = entry(&["Type"], &["A", "B", "Type"]);
        let options = SamplingOptions {
            size_mode: SizeMode::Fraction { p: 0.75 },
            most_relevant_p: 0.5,
            ..SamplingOptions::default()
        };
        let selector = FeatureSelector::new(&entry, &index, &options);
        let necessary = selector.necessary().expect("necessary");
        let mut rng = ScriptedSource::default();

        // round(6 * 0.75) = 5, minus one necessary = 4; floor(4 * 0.5) = 2,
        // minus the necessary attribute already in the relevant list = 1.
        let quotas = selector.quotas(&necessary, &mut rng);
        assert_eq!(
            quotas,
            TierQuotas {
                remaining: 4,
                most_relevant: 1,
                general: 3,
            }
        );
    }

    #[test]
    fn remaining_slots_floor_at_one_when_necessary_fills_target() {
        let index = index(&["A", "B", "Type", "Order"]);
        let entry = entry(&["Type", "Order"], &[]);
        let options = SamplingOptions {
            size_mode: SizeMode::Fraction { p: 0.25 },
            ..SamplingOptions::default()
        };
        let selector = FeatureSelector::new(&entry, &index, &options);
        let necessary = selector.necessary().expect("necessary");
        let quotas = selector.quotas(&necessary, &mut ScriptedSource::default());
        assert_eq!(quotas.remaining, 1);
        assert_eq!(quotas.most_relevant, 0);
        assert_eq!(quotas.general, 1);
    }

    #[test]
    fn range_mode_draws_within_bounds() {
        let index = index(&["A"]);
        let entry = entry(&[], &[]);
        let options = SamplingOptions::default();
        let selector = FeatureSelector::new(&entry, &index, &options);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let quotas = selector.quotas(&[], &mut rng);
            assert!((5..=8).contains(&quotas.remaining));
        }
    }

    #[test]
    fn most_relevant_pool_excludes_sample_keys_and_absent_attributes() {
        let index = index(&["A", "B", "C"]);
        let entry = entry(&[], &["A", "B", "Missing"]);
        let options = SamplingOptions::default();
        let selector = FeatureSelector::new(&entry, &index, &options);

        let mut sample = Sample::new();
        sample.insert("A", "1");
        assert_eq!(selector.most_relevant_pool(&sample), vec!["B"]);
        assert_eq!(selector.general_pool(), vec!["C"]);
    }

    #[test]
    fn empty_pool_is_skipped_unless_strict() {
        let index = index(&["A"]);
        let entry = entry(&[], &["A"]);
        let mut options = SamplingOptions::default();
        let selector = FeatureSelector::new(&entry, &index, &options);
        let drawn = selector
            .draw_general(3, &mut ScriptedSource::default())
            .expect("permissive draw");
        assert!(drawn.is_empty());

        options.strict = true;
        let selector = FeatureSelector::new(&entry, &index, &options);
        let result = selector.draw_general(3, &mut ScriptedSource::default());
        assert!(matches!(
            result,
            Err(SamplingError::Core(Error::EmptyPool(_)))
        ));
    }

    #[test]
    fn missing_necessary_attribute_fails_in_strict_mode() {
        let index = index(&["A"]);
        let entry = entry(&["Type"], &[]);
        let options = SamplingOptions::default();
        let selector = FeatureSelector::new(&entry, &index, &options);
        assert!(selector.necessary().expect("permissive").is_empty());

        let strict = SamplingOptions {
            strict: true,
            ..SamplingOptions::default()
        };
        let selector = FeatureSelector::new(&entry, &index, &strict);
        assert!(selector.necessary().is_err());
    }
}
