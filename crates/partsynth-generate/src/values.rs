use regex::Regex;

use partsynth_core::{CatalogIndex, Error, Taxonomy};

use crate::errors::SamplingError;
use crate::model::SamplingOptions;
use crate::rng::RandomSource;

const NUMBER_PATTERN: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)";
const FRACTION_MIN: u32 = 1;
const FRACTION_MAX: u32 = 10;

/// A raw catalog value split into magnitude and unit suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericValue {
    pub magnitude: f64,
    pub unit: String,
}

/// Splits `"1000mW"`-style values into a number and the text around it.
#[derive(Debug, Clone)]
pub struct NumericParser {
    pattern: Regex,
}

impl NumericParser {
    pub fn new() -> Result<Self, SamplingError> {
        let pattern = Regex::new(NUMBER_PATTERN).map_err(|err| {
            SamplingError::InvalidOptions(format!("invalid numeric pattern: {err}"))
        })?;
        Ok(Self { pattern })
    }

    /// The first decimal token becomes the magnitude; the rest of the string,
    /// trimmed, is the unit.
    pub fn parse(&self, attribute: &str, raw: &str) -> Result<NumericValue, Error> {
        let malformed = || Error::MalformedNumericValue {
            attribute: attribute.to_string(),
            value: raw.to_string(),
        };

        let found = self.pattern.find(raw).ok_or_else(malformed)?;
        let magnitude = found
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(malformed)?;
        let unit = format!("{}{}", &raw[..found.start()], &raw[found.end()..])
            .trim()
            .to_string();

        Ok(NumericValue { magnitude, unit })
    }
}

/// Produces the value string for one attribute of one component.
#[derive(Debug, Clone, Copy)]
pub struct ValueSynthesizer<'a> {
    index: &'a CatalogIndex,
    taxonomy: &'a Taxonomy,
    options: &'a SamplingOptions,
    parser: &'a NumericParser,
}

impl<'a> ValueSynthesizer<'a> {
    pub fn new(
        index: &'a CatalogIndex,
        taxonomy: &'a Taxonomy,
        options: &'a SamplingOptions,
        parser: &'a NumericParser,
    ) -> Self {
        Self {
            index,
            taxonomy,
            options,
            parser,
        }
    }

    /// Synthesize a value, or `None` when the component never observed the
    /// attribute (an error in strict mode).
    pub fn synthesize<R: RandomSource>(
        &self,
        attribute: &str,
        rng: &mut R,
    ) -> Result<Option<String>, SamplingError> {
        let Some(values) = self.index.values_of(attribute) else {
            if self.options.strict {
                return Err(Error::EmptyPool(format!(
                    "component '{}' has no values for '{attribute}'",
                    self.index.component
                ))
                .into());
            }
            return Ok(None);
        };

        if !self.taxonomy.is_numeric(attribute) {
            return Ok(rng.choose(values).cloned());
        }

        self.numeric(attribute, values, rng).map(Some)
    }

    fn numeric<R: RandomSource>(
        &self,
        attribute: &str,
        values: &[String],
        rng: &mut R,
    ) -> Result<String, SamplingError> {
        let draws = self.options.numeric_draws.max(1);
        let mut total = 0.0;
        let mut unit = String::new();
        for _ in 0..draws {
            let Some(raw) = rng.choose(values) else {
                break;
            };
            let parsed = self.parser.parse(attribute, raw)?;
            total += parsed.magnitude;
            // The last draw decides the unit; draws are not checked for agreement.
            unit = parsed.unit;
        }
        let value = total / draws as f64;

        if let Some(alternates) = self.taxonomy.units.alternates(&unit) {
            let choices: Vec<(&String, &f64)> = alternates.iter().collect();
            if let Some((alternate, multiplier)) = rng.choose(&choices) {
                let converted = rescale(value, **multiplier);
                return Ok(format!("{}{alternate}", format_magnitude(converted)));
            }
        }

        if rng.chance(self.options.fraction_probability) {
            let numerator = rng.range_inclusive(FRACTION_MIN, FRACTION_MAX);
            let denominator = rng.range_inclusive(FRACTION_MIN, FRACTION_MAX);
            return Ok(format!("{numerator}/{denominator}{unit}"));
        }

        Ok(format!("{}{unit}", format_magnitude(value)))
    }
}

/// Bring a value into the range natural for a unit with the given multiplier.
///
/// Below 1 the value is multiplied while it stays at or above `1 / multiplier`;
/// above 1 it is divided while it stays at or above `multiplier`. The step
/// count is computed directly, so multipliers close to 1 cost the same as any
/// other.
pub fn rescale(value: f64, multiplier: f64) -> f64 {
    if !value.is_finite() || !multiplier.is_finite() || multiplier <= 0.0 || multiplier == 1.0 {
        return value;
    }
    let base = if multiplier < 1.0 {
        multiplier.recip()
    } else {
        multiplier
    };
    if value < base {
        return value;
    }

    let mut steps = (value.ln() / base.ln()).floor().max(0.0);
    let mut scaled = value / base.powf(steps);
    // The logarithm ratio can land one step off either way.
    if scaled >= base {
        steps += 1.0;
        scaled = value / base.powf(steps);
    } else if scaled < 1.0 && steps > 0.0 {
        steps -= 1.0;
        scaled = value / base.powf(steps);
    }
    scaled
}

/// Round to three decimals and drop trailing zeros (`8.000` -> `8`).
pub fn format_magnitude(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
