use tracing::debug;

use partsynth_core::{
    CATEGORY_KEY, CLASS_KEY, Catalog, CatalogIndex, ClassTaxonomyEntry, Error, INPUT_CLASS_KEY,
    Taxonomy,
};

use crate::errors::SamplingError;
use crate::model::SamplingOptions;
use crate::pairs::PairExpander;
use crate::rng::RandomSource;
use crate::sample::Sample;
use crate::selector::{FeatureSelector, Tier};
use crate::serializer::SampleRenderer;
use crate::values::{NumericParser, ValueSynthesizer};

/// Synthesizes samples for components of a shared, read-only catalog.
///
/// A session holds no per-sample state; every call builds its own [`Sample`].
#[derive(Debug, Clone)]
pub struct SamplingSession<'a> {
    catalog: &'a Catalog,
    taxonomy: &'a Taxonomy,
    options: SamplingOptions,
    parser: NumericParser,
    empty_entry: ClassTaxonomyEntry,
}

impl<'a> SamplingSession<'a> {
    pub fn new(
        catalog: &'a Catalog,
        taxonomy: &'a Taxonomy,
        options: SamplingOptions,
    ) -> Result<Self, SamplingError> {
        options.validate()?;
        Ok(Self {
            catalog,
            taxonomy,
            options,
            parser: NumericParser::new()?,
            empty_entry: ClassTaxonomyEntry::default(),
        })
    }

    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }

    /// Build one sample for a component.
    pub fn sample<R: RandomSource>(
        &self,
        component: &str,
        rng: &mut R,
    ) -> Result<Sample, SamplingError> {
        let index = self
            .catalog
            .component(component)
            .ok_or_else(|| Error::UnknownComponent(component.to_string()))?;
        let class = self.taxonomy.class_of(component)?;
        let entry = match self.taxonomy.taxonomy_of(class) {
            Some(entry) => entry,
            None => {
                debug!(component, class, "class has no taxonomy entry");
                &self.empty_entry
            }
        };

        let selector = FeatureSelector::new(entry, index, &self.options);
        let tiers = TierFiller {
            expander: PairExpander::new(&self.taxonomy.pairs, self.options.pair_probability),
            synthesizer: ValueSynthesizer::new(index, self.taxonomy, &self.options, &self.parser),
            index,
        };

        let sample = self.with_metadata(Sample::new(), class, component, rng);

        let necessary = selector.necessary()?;
        let sample = tiers.fill(sample, Tier::Necessary, &necessary, rng)?;

        let quotas = selector.quotas(&necessary, rng);

        let relevant = selector.draw_most_relevant(quotas.most_relevant, &sample, rng)?;
        let sample = tiers.fill(sample, Tier::MostRelevant, &relevant, rng)?;

        let general = selector.draw_general(quotas.general, rng)?;
        let sample = tiers.fill(sample, Tier::General, &general, rng)?;

        debug!(
            component,
            class,
            target = quotas.remaining,
            necessary = necessary.len(),
            most_relevant = relevant.len(),
            general = general.len(),
            fields = sample.field_count(),
            "sample built"
        );

        Ok(sample)
    }

    /// Render a sample with this session's delimiter settings.
    pub fn render<R: RandomSource>(&self, sample: &Sample, rng: &mut R) -> String {
        SampleRenderer::new(self.options.delimiter_switch_probability).render(sample, rng)
    }

    /// Build one sample and its rendered string.
    pub fn sample_rendered<R: RandomSource>(
        &self,
        component: &str,
        rng: &mut R,
    ) -> Result<(Sample, String), SamplingError> {
        let sample = self.sample(component, rng)?;
        let text = self.render(&sample, rng);
        Ok((sample, text))
    }

    fn with_metadata<R: RandomSource>(
        &self,
        mut sample: Sample,
        class: &str,
        component: &str,
        rng: &mut R,
    ) -> Sample {
        sample.insert(CLASS_KEY, class);
        sample.insert(CATEGORY_KEY, component);

        let aliases = self.taxonomy.aliases_of(class);
        if !aliases.is_empty()
            && rng.chance(self.options.alias_probability)
            && let Some(alias) = rng.choose(aliases)
        {
            sample.insert(INPUT_CLASS_KEY, alias.as_str());
        }

        sample
    }
}

/// Expands one tier's attributes and adds their values to the sample.
struct TierFiller<'a> {
    expander: PairExpander<'a>,
    synthesizer: ValueSynthesizer<'a>,
    index: &'a CatalogIndex,
}

impl TierFiller<'_> {
    fn fill<R: RandomSource>(
        &self,
        mut sample: Sample,
        tier: Tier,
        attributes: &[String],
        rng: &mut R,
    ) -> Result<Sample, SamplingError> {
        let expanded = self.expander.expand(attributes, rng);
        for attribute in &expanded {
            match self.synthesizer.synthesize(attribute, rng)? {
                Some(value) => sample.insert(attribute.as_str(), value),
                None => debug!(
                    component = %self.index.component,
                    tier = tier.as_str(),
                    attribute = %attribute,
                    "attribute has no observed values"
                ),
            }
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use partsynth_core::ComponentRecord;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn fixture() -> (Catalog, Taxonomy) {
        let records: Vec<ComponentRecord> = vec![
            [("Type", "Active"), ("Order", "2nd"), ("Channels", "1")]
                .into_iter()
                .collect(),
            [("Type", "Passive"), ("Order", "4th"), ("Package", "SOIC")]
                .into_iter()
                .collect(),
        ];
        let mut catalog = Catalog::new();
        catalog.insert(CatalogIndex::from_records("Active Filters", &records));

        let mut taxonomy = Taxonomy::default();
        taxonomy
            .class_members
            .insert("Filters".to_string(), vec!["Active Filters".to_string()]);
        taxonomy.classes.insert(
            "Filters".to_string(),
            ClassTaxonomyEntry::from_labels(BTreeMap::from([
                ("necessary".to_string(), vec!["Type".to_string()]),
                ("Most Relevant".to_string(), vec!["Order".to_string()]),
            ])),
        );
        (catalog, taxonomy)
    }

    #[test]
    fn rejects_invalid_options() {
        let (catalog, taxonomy) = fixture();
        let options = SamplingOptions {
            alias_probability: -0.1,
            ..SamplingOptions::default()
        };
        assert!(SamplingSession::new(&catalog, &taxonomy, options).is_err());
    }

    #[test]
    fn unknown_components_fail() {
        let (catalog, taxonomy) = fixture();
        let session =
            SamplingSession::new(&catalog, &taxonomy, SamplingOptions::default()).expect("session");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            session.sample("Relays", &mut rng),
            Err(SamplingError::Core(Error::UnknownComponent(_)))
        ));
    }

    #[test]
    fn metadata_and_necessary_fields_are_present() {
        let (catalog, taxonomy) = fixture();
        let session =
            SamplingSession::new(&catalog, &taxonomy, SamplingOptions::default()).expect("session");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let sample = session.sample("Active Filters", &mut rng).expect("sample");

        assert_eq!(sample.get("class"), Some("Filters"));
        assert_eq!(sample.get("category"), Some("Active Filters"));
        assert!(matches!(sample.get("Type"), Some("Active" | "Passive")));
        assert!(!sample.contains_key("input class"));
    }

    #[test]
    fn alias_is_added_when_draw_hits() {
        let (catalog, mut taxonomy) = fixture();
        taxonomy
            .aliases
            .insert("Filters".to_string(), vec!["Signal Filters".to_string()]);
        let options = SamplingOptions {
            alias_probability: 1.0,
            ..SamplingOptions::default()
        };
        let session = SamplingSession::new(&catalog, &taxonomy, options).expect("session");
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sample = session.sample("Active Filters", &mut rng).expect("sample");
        assert_eq!(sample.get("input class"), Some("Signal Filters"));
    }
}
