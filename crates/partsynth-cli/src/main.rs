mod config;
mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use partsynth_core::{Catalog, Error as CoreError, component_name_from_stem, validate_taxonomy};
use partsynth_generate::{SamplingError, SamplingSession, SizeMode, sample_rng};
use partsynth_load::{FsLoader, Loader};
use registry::{RunContext, init_run_logging, init_stderr_logging, start_run};
use thiserror::Error;
use uuid::Uuid;

use config::{CliConfig, ConfigError, load_config};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("sampling error: {0}")]
    Sampling(#[from] SamplingError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "partsynth", version, about = "Synthetic component spec sampler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate samples for many components and write a run directory.
    Generate(GenerateArgs),
    /// Print one sample for a component.
    Sample(SampleArgs),
    /// List catalog components and their classes.
    Components(DataArgs),
    /// Check the taxonomy against the catalogs.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct DataArgs {
    /// TOML config file (defaults to ./partsynth.toml when present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory holding the catalog and taxonomy tables.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl DataArgs {
    fn resolve(&self) -> Result<CliConfig, CliError> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.data.data_dir = data_dir.clone();
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Output directory for runs.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Samples per component.
    #[arg(long)]
    count: Option<u32>,
    /// Component to sample; repeat for several. Defaults to every catalog component.
    #[arg(long = "component", value_name = "NAME")]
    components: Vec<String>,
    /// Fail on the first sampling error instead of skipping the component.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Size samples as this fraction of the component's attributes.
    #[arg(long, value_name = "P")]
    fraction: Option<f64>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[command(flatten)]
    data: DataArgs,
    #[arg(long, value_name = "NAME")]
    component: String,
    #[arg(long)]
    seed: Option<u64>,
    /// Sample index within the batch the seed would produce.
    #[arg(long, default_value_t = 0)]
    index: u32,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Treat classes without a taxonomy entry as errors.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Sample(args) => run_sample(args),
        Command::Components(args) => run_components(args),
        Command::Validate(args) => run_validate(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut config = args.data.resolve()?;
    if let Some(out_dir) = args.out_dir {
        config.run.out_dir = out_dir;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(count) = args.count {
        config.run.samples_per_component = count;
    }
    if args.strict {
        config.sampling.strict = true;
    }
    if let Some(p) = args.fraction {
        config.sampling.size_mode = SizeMode::Fraction { p };
    }
    config.sampling.validate()?;

    let components = if args.components.is_empty() {
        None
    } else {
        Some(
            args.components
                .iter()
                .map(|name| component_name_from_stem(name))
                .collect(),
        )
    };
    let options = config.generate_options(components);

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        out_dir: options.out_dir.clone(),
        seed: options.seed,
        samples_per_component: options.samples_per_component,
        components: options.components.clone(),
        data: config.data.clone(),
        sampling: options.sampling.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, seed = options.seed);
    tracing::info!(event = "config_written", path = %run_paths.config_path.display());
    let timer = Instant::now();

    let loader = FsLoader::new(config.data.clone());
    let taxonomy = loader.load_taxonomy()?;
    let catalog = match &options.components {
        Some(components) => load_selected(&loader, components, options.sampling.strict)?,
        None => loader.load_catalog_all()?,
    };
    tracing::info!(
        event = "data_loaded",
        source = %loader.source(),
        components = catalog.len()
    );

    let engine = partsynth_generate::GenerationEngine::new(options);
    let result = engine.run_in_dir(&run_id, run_paths.root.clone(), &catalog, &taxonomy);
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(event = "run_finished", status = "failed", error = %err);
            return Err(err.into());
        }
    };

    for failure in &result.report.failures {
        eprintln!(
            "skipped {}: [{}] {}",
            failure.component, failure.code, failure.message
        );
    }
    println!("{}", result.run_dir.display());

    tracing::info!(
        event = "run_finished",
        status = "success",
        samples = result.report.samples_total,
        failures = result.report.failures.len(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    Ok(())
}

/// Load only the requested catalogs; unknown names are left for the engine to report.
fn load_selected(
    loader: &FsLoader,
    components: &[String],
    strict: bool,
) -> Result<Catalog, CliError> {
    let mut catalog = Catalog::new();
    for component in components {
        match loader.load_catalog(component) {
            Ok(index) => catalog.insert(index),
            Err(CoreError::UnknownComponent(name)) if !strict => {
                tracing::warn!(event = "catalog_missing", component = %name);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(catalog)
}

fn run_sample(args: SampleArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let config = args.data.resolve()?;
    let seed = args.seed.unwrap_or(config.run.seed);
    let component = component_name_from_stem(&args.component);

    let loader = FsLoader::new(config.data.clone());
    let taxonomy = loader.load_taxonomy()?;
    let mut catalog = Catalog::new();
    catalog.insert(loader.load_catalog(&component)?);

    let session = SamplingSession::new(&catalog, &taxonomy, config.sampling.clone())?;
    let mut rng = sample_rng(seed, &component, args.index);
    let (sample, text) = session.sample_rendered(&component, &mut rng)?;

    println!("{}", serde_json::to_string_pretty(&sample)?);
    println!("{text}");
    Ok(())
}

fn run_components(args: DataArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let config = args.resolve()?;
    let loader = FsLoader::new(config.data);
    let taxonomy = loader.load_taxonomy()?;

    for component in loader.list_components()? {
        let class = taxonomy.class_of(&component).unwrap_or("<unknown>");
        println!("{component}\t{class}");
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let config = args.data.resolve()?;
    let loader = FsLoader::new(config.data);
    let taxonomy = loader.load_taxonomy()?;
    let catalog = loader.load_catalog_all()?;

    let warnings = validate_taxonomy(&taxonomy, &catalog, args.strict)?;
    for warning in &warnings {
        println!("{}: {}", warning.code, warning.message);
    }
    if args.strict && !warnings.is_empty() {
        return Err(CliError::InvalidConfig(format!(
            "{} taxonomy warning(s) in strict mode",
            warnings.len()
        )));
    }
    Ok(())
}
