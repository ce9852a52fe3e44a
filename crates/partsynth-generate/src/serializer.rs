use crate::rng::RandomSource;
use crate::sample::Sample;

/// Characters used to join rendered fields.
pub const DELIMITERS: [char; 7] = ['#', ',', '/', ';', ':', '-', '_'];

/// Renders a sample's non-metadata values as one delimiter-joined string.
#[derive(Debug, Clone, Copy)]
pub struct SampleRenderer {
    switch_probability: f64,
}

impl SampleRenderer {
    pub fn new(switch_probability: f64) -> Self {
        Self { switch_probability }
    }

    /// Fields follow the sample's insertion order. The delimiter is sticky: before
    /// each field after the first it is redrawn with the switch probability.
    /// Delimiter characters at either end of the result are stripped. `-` is a
    /// delimiter, so a sign leading the first value is stripped with them:
    /// `-5mV` rendered first comes out as `5mV`. Later values keep their sign.
    pub fn render<R: RandomSource>(&self, sample: &Sample, rng: &mut R) -> String {
        let mut rendered = String::new();
        let mut delimiter: Option<char> = None;

        for (_, value) in sample.fields() {
            let current = match delimiter {
                Some(previous) if !rng.chance(self.switch_probability) => previous,
                _ => rng.choose(&DELIMITERS).copied().unwrap_or(DELIMITERS[0]),
            };
            delimiter = Some(current);
            rendered.push_str(value);
            rendered.push(current);
        }

        rendered.trim_matches(&DELIMITERS[..]).to_string()
    }
}

pub fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(&ch)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::rng::ScriptedSource;

    fn sample() -> Sample {
        [
            ("class", "Filters"),
            ("category", "Active Filters"),
            ("Type", "Active"),
            ("Order", "2nd"),
            ("Cutoff", "10kHz"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn skips_metadata_and_keeps_sticky_delimiter() {
        // First delimiter index 3 (';'); both later switch draws miss.
        let mut rng = ScriptedSource::new([0.5, 0.5], [3]);
        let rendered = SampleRenderer::new(0.1).render(&sample(), &mut rng);
        assert_eq!(rendered, "Active;2nd;10kHz");
    }

    #[test]
    fn switches_delimiter_when_draw_hits() {
        // ';' first, then a switch to '#', then sticky.
        let mut rng = ScriptedSource::new([0.05, 0.5], [3, 0]);
        let rendered = SampleRenderer::new(0.1).render(&sample(), &mut rng);
        assert_eq!(rendered, "Active;2nd#10kHz");
    }

    #[test]
    fn never_starts_or_ends_with_a_delimiter() {
        let mut sample = sample();
        sample.insert("Offset", "-5mV");
        sample.insert("Label", "rev_");
        let renderer = SampleRenderer::new(0.1);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            let rendered = renderer.render(&sample, &mut rng);
            assert!(!rendered.starts_with(is_delimiter));
            assert!(!rendered.ends_with(is_delimiter));
        }
    }

    #[test]
    fn leading_sign_of_first_field_is_trimmed() {
        let sample: Sample = [("class", "Amplifiers"), ("Offset", "-5mV"), ("Gain", "2")]
            .into_iter()
            .collect();
        let mut rng = ScriptedSource::new([0.5], [3]);
        let rendered = SampleRenderer::new(0.1).render(&sample, &mut rng);
        assert_eq!(rendered, "5mV;2");
        assert_eq!(rng.remaining_floats(), 0);
        assert_eq!(rng.remaining_indices(), 0);
    }

    #[test]
    fn negative_values_after_the_first_keep_their_sign() {
        let sample: Sample = [("class", "Amplifiers"), ("Gain", "2"), ("Offset", "-5mV")]
            .into_iter()
            .collect();
        let mut rng = ScriptedSource::new([0.5], [3]);
        let rendered = SampleRenderer::new(0.1).render(&sample, &mut rng);
        assert_eq!(rendered, "2;-5mV");
    }

    #[test]
    fn empty_sample_renders_empty() {
        let sample: Sample = [("class", "Filters")].into_iter().collect();
        let rendered = SampleRenderer::new(0.1).render(&sample, &mut ScriptedSource::default());
        assert!(rendered.is_empty());
    }
}
