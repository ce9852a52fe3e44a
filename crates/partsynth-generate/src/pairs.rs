use partsynth_core::PairTable;

use crate::rng::RandomSource;

/// Adds correlated partners to a selected attribute list.
#[derive(Debug, Clone, Copy)]
pub struct PairExpander<'a> {
    pairs: &'a PairTable,
    probability: f64,
}

impl<'a> PairExpander<'a> {
    pub fn new(pairs: &'a PairTable, probability: f64) -> Self {
        Self { pairs, probability }
    }

    /// Each attribute is kept, then followed (independently, with the configured
    /// probability) by its forward partner and by the attribute mapping to it.
    ///
    /// The result may repeat names and may reach outside the planned tiers.
    pub fn expand<R: RandomSource>(&self, selected: &[String], rng: &mut R) -> Vec<String> {
        let mut expanded = Vec::with_capacity(selected.len() * 2);
        for attribute in selected {
            expanded.push(attribute.clone());
            if let Some(partner) = self.pairs.partner_of(attribute)
                && rng.chance(self.probability)
            {
                expanded.push(partner.to_string());
            }
            if let Some(source) = self.pairs.source_of(attribute)
                && rng.chance(self.probability)
            {
                expanded.push(source.to_string());
            }
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn table() -> PairTable {
        [("PowerRating", "PowerUnit"), ("Voltage", "VoltageUnit")]
            .into_iter()
            .collect()
    }

    #[test]
    fn adds_partners_in_both_directions() {
        let pairs = table();
        let expander = PairExpander::new(&pairs, 0.9);
        let mut rng = ScriptedSource::from_floats([0.1, 0.5]);

        let selected = names(&["PowerRating", "VoltageUnit", "Type"]);
        let expanded = expander.expand(&selected, &mut rng);
        assert_eq!(
            expanded,
            names(&["PowerRating", "PowerUnit", "VoltageUnit", "Voltage", "Type"])
        );
    }

    #[test]
    fn skips_partner_when_draw_misses() {
        let pairs = table();
        let expander = PairExpander::new(&pairs, 0.9);
        let mut rng = ScriptedSource::from_floats([0.95]);

        let expanded = expander.expand(&names(&["PowerRating"]), &mut rng);
        assert_eq!(expanded, names(&["PowerRating"]));
        assert_eq!(rng.remaining_floats(), 0);
    }

    #[test]
    fn probability_bounds_are_absolute() {
        let pairs = table();
        let selected = names(&["PowerRating", "PowerUnit"]);

        let always = PairExpander::new(&pairs, 1.0);
        let mut rng = ScriptedSource::from_floats([0.999, 0.999]);
        assert_eq!(
            always.expand(&selected, &mut rng),
            names(&["PowerRating", "PowerUnit", "PowerUnit", "PowerRating"])
        );

        let never = PairExpander::new(&pairs, 0.0);
        let mut rng = ScriptedSource::from_floats([0.0, 0.0]);
        assert_eq!(never.expand(&selected, &mut rng), selected);
    }
}
