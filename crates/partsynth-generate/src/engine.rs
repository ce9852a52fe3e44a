use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use partsynth_core::{CLASS_KEY, Catalog, Taxonomy};

use crate::errors::SamplingError;
use crate::model::{ComponentReport, GenerateOptions, GenerationReport};
use crate::output::csv::write_samples_csv;
use crate::output::jsonl::write_samples_jsonl;
use crate::sample::Sample;
use crate::session::SamplingSession;

/// One sample produced by a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSample {
    pub component: String,
    pub index: u32,
    pub class: String,
    pub sample: Sample,
    pub text: String,
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for batch generation over many components.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate every requested sample and write the run artifacts into a
    /// fresh `<out_dir>/<timestamp>__run_<uuid>/` directory.
    pub fn run(
        &self,
        catalog: &Catalog,
        taxonomy: &Taxonomy,
    ) -> Result<GenerationResult, SamplingError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        self.run_in_dir(&run_id, run_dir, catalog, taxonomy)
    }

    /// Like [`GenerationEngine::run`], writing into a caller-chosen directory.
    pub fn run_in_dir(
        &self,
        run_id: &str,
        run_dir: PathBuf,
        catalog: &Catalog,
        taxonomy: &Taxonomy,
    ) -> Result<GenerationResult, SamplingError> {
        std::fs::create_dir_all(&run_dir)?;

        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), SamplingError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        let (samples, mut report) = match self.generate(run_id.to_string(), catalog, taxonomy) {
            Ok(outcome) => outcome,
            Err(SamplingError::Failed(report)) => {
                write_report(&report)?;
                warn!(run_id = %run_id, "generation failed");
                return Err(SamplingError::Failed(report));
            }
            Err(err) => return Err(err),
        };

        let mut bytes_written = write_samples_jsonl(&run_dir.join("samples.jsonl"), &samples)?;
        bytes_written += write_samples_csv(&run_dir.join("samples.csv"), &samples)?;
        report.bytes_written = bytes_written;
        write_report(&report)?;

        info!(
            run_id = %run_id,
            run_dir = %run_dir.display(),
            samples = report.samples_total,
            bytes_written = report.bytes_written,
            "artifacts written"
        );

        Ok(GenerationResult { run_dir, report })
    }

    /// Generate every requested sample without touching the filesystem.
    pub fn generate_in_memory(
        &self,
        catalog: &Catalog,
        taxonomy: &Taxonomy,
    ) -> Result<(Vec<GeneratedSample>, GenerationReport), SamplingError> {
        self.generate(uuid::Uuid::new_v4().to_string(), catalog, taxonomy)
    }

    fn generate(
        &self,
        run_id: String,
        catalog: &Catalog,
        taxonomy: &Taxonomy,
    ) -> Result<(Vec<GeneratedSample>, GenerationReport), SamplingError> {
        let start = Instant::now();
        let session = SamplingSession::new(catalog, taxonomy, self.options.sampling.clone())?;
        let strict = self.options.sampling.strict;
        let components = self.components(catalog);
        let mut report = GenerationReport::new(run_id.clone(), self.options.seed);
        let mut samples = Vec::new();

        info!(
            run_id = %run_id,
            components = components.len(),
            samples_per_component = self.options.samples_per_component,
            seed = self.options.seed,
            strict,
            "generation started"
        );

        for component in &components {
            let component_start = Instant::now();
            let mut component_report = ComponentReport {
                component: component.clone(),
                class: taxonomy.class_of(component).ok().map(str::to_string),
                samples_requested: self.options.samples_per_component,
                samples_generated: 0,
                fields_total: 0,
            };

            for sample_index in 0..self.options.samples_per_component {
                let mut rng = sample_rng(self.options.seed, component, sample_index);
                match session.sample_rendered(component, &mut rng) {
                    Ok((sample, text)) => {
                        component_report.samples_generated += 1;
                        component_report.fields_total += sample.field_count() as u64;
                        samples.push(GeneratedSample {
                            component: component.clone(),
                            index: sample_index,
                            class: sample.get(CLASS_KEY).unwrap_or_default().to_string(),
                            sample,
                            text,
                        });
                    }
                    Err(err) => {
                        warn!(
                            component = %component,
                            sample_index,
                            code = err.code(),
                            error = %err,
                            "component generation failed"
                        );
                        report.record_failure(component, &err);
                        if strict {
                            report.record_component(component_report);
                            report.duration_ms = start.elapsed().as_millis() as u64;
                            return Err(SamplingError::Failed(report));
                        }
                        break;
                    }
                }
            }

            info!(
                component = %component,
                samples_generated = component_report.samples_generated,
                duration_ms = component_start.elapsed().as_millis() as u64,
                "component generated"
            );
            report.record_component(component_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            samples = report.samples_total,
            failures = report.failures.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok((samples, report))
    }

    fn components(&self, catalog: &Catalog) -> Vec<String> {
        match &self.options.components {
            Some(requested) => requested.clone(),
            None => catalog.component_names().map(str::to_string).collect(),
        }
    }
}

/// Random source for one sample of a batch.
///
/// Depends only on the run seed, the component and the sample index, so a
/// single sample can be reproduced without rerunning the batch.
pub fn sample_rng(seed: u64, component: &str, sample_index: u32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_sample_seed(hash_seed(seed, component), sample_index))
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn hash_sample_seed(component_seed: u64, sample_index: u32) -> u64 {
    let mut hash = component_seed ^ (sample_index as u64).wrapping_mul(0x9e3779b97f4a7c15);
    hash = hash.wrapping_mul(0x100000001b3);
    hash
}
