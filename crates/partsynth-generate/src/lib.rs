//! Sampling engine for partsynth.
//!
//! Given a component catalog and the class taxonomy, this crate synthesizes
//! partial product-specification samples: it selects attributes tier by tier,
//! expands correlated pairs, synthesizes values (including numeric unit
//! diversification), and renders each sample as one delimiter-joined string.

pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod pairs;
pub mod rng;
pub mod sample;
pub mod selector;
pub mod serializer;
pub mod session;
pub mod values;

pub use engine::{GeneratedSample, GenerationEngine, GenerationResult, sample_rng};
pub use errors::SamplingError;
pub use model::{
    ComponentFailure, ComponentReport, GenerateOptions, GenerationReport, SamplingOptions,
    SizeMode,
};
pub use rng::{RandomSource, ScriptedSource};
pub use sample::Sample;
pub use session::SamplingSession;
