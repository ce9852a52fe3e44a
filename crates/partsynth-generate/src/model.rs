use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::SamplingError;

/// How the target sample size is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SizeMode {
    /// `round(attribute_count * p)`.
    Fraction { p: f64 },
    /// Uniform integer in `[min, max]`.
    Range { min: u32, max: u32 },
}

impl Default for SizeMode {
    fn default() -> Self {
        SizeMode::Range { min: 5, max: 8 }
    }
}

/// Knobs for a single sampling session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    pub size_mode: SizeMode,
    /// Share of the remaining slots reserved for most-relevant attributes.
    pub most_relevant_p: f64,
    /// Chance of pulling in an attribute's correlated partner.
    pub pair_probability: f64,
    /// Observed values averaged per numeric attribute.
    pub numeric_draws: usize,
    /// Chance a numeric value without unit conversions renders as a random fraction.
    pub fraction_probability: f64,
    /// Chance of adding an `input class` alias when the class has any.
    pub alias_probability: f64,
    /// Chance of picking a new delimiter before each rendered field.
    pub delimiter_switch_probability: f64,
    /// Fail on empty pools and missing necessary attributes instead of skipping.
    pub strict: bool,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            size_mode: SizeMode::default(),
            most_relevant_p: 0.5,
            pair_probability: 0.9,
            numeric_draws: 2,
            fraction_probability: 0.3,
            alias_probability: 0.2,
            delimiter_switch_probability: 0.1,
            strict: false,
        }
    }
}

impl SamplingOptions {
    pub fn validate(&self) -> Result<(), SamplingError> {
        let probabilities = [
            ("most_relevant_p", self.most_relevant_p),
            ("pair_probability", self.pair_probability),
            ("fraction_probability", self.fraction_probability),
            ("alias_probability", self.alias_probability),
            (
                "delimiter_switch_probability",
                self.delimiter_switch_probability,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(SamplingError::InvalidOptions(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        match self.size_mode {
            SizeMode::Fraction { p } if !(0.0..=1.0).contains(&p) => {
                return Err(SamplingError::InvalidOptions(format!(
                    "size fraction must be within [0, 1], got {p}"
                )));
            }
            SizeMode::Range { min, max } if min > max => {
                return Err(SamplingError::InvalidOptions(format!(
                    "size range min {min} exceeds max {max}"
                )));
            }
            _ => {}
        }

        if self.numeric_draws == 0 {
            return Err(SamplingError::InvalidOptions(
                "numeric_draws must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Options for a batch generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    pub seed: u64,
    pub samples_per_component: u32,
    /// Components to sample; `None` means every catalog component.
    pub components: Option<Vec<String>>,
    pub sampling: SamplingOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("runs"),
            seed: 0,
            samples_per_component: 10,
            components: None,
            sampling: SamplingOptions::default(),
        }
    }
}

/// Summary of one generated component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentReport {
    pub component: String,
    pub class: Option<String>,
    pub samples_requested: u32,
    pub samples_generated: u32,
    /// Non-metadata fields across all generated samples.
    pub fields_total: u64,
}

/// A component whose generation stopped on an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFailure {
    pub component: String,
    pub code: String,
    pub message: String,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub components: Vec<ComponentReport>,
    pub samples_total: u64,
    pub failures: Vec<ComponentFailure>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            components: Vec::new(),
            samples_total: 0,
            failures: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_component(&mut self, report: ComponentReport) {
        self.samples_total += u64::from(report.samples_generated);
        self.components.push(report);
    }

    pub fn record_failure(&mut self, component: &str, err: &SamplingError) {
        self.failures.push(ComponentFailure {
            component: component.to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        });
    }
}
