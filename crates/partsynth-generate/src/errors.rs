use thiserror::Error;

use crate::model::GenerationReport;

/// Errors emitted by the sampling engine.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error(transparent)]
    Core(#[from] partsynth_core::Error),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("generation failed")]
    Failed(GenerationReport),
}

impl SamplingError {
    /// Stable identifier used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            SamplingError::Core(err) => match err {
                partsynth_core::Error::InvalidInputFormat(_) => "invalid_input_format",
                partsynth_core::Error::UnknownComponent(_) => "unknown_component",
                partsynth_core::Error::MalformedNumericValue { .. } => "malformed_numeric_value",
                partsynth_core::Error::EmptyPool(_) => "empty_pool",
                partsynth_core::Error::InvalidData(_) => "invalid_data",
                partsynth_core::Error::Io(_) => "io",
                partsynth_core::Error::Json(_) => "json",
            },
            SamplingError::InvalidOptions(_) => "invalid_options",
            SamplingError::Io(_) => "io",
            SamplingError::Json(_) => "json",
            SamplingError::Csv(_) => "csv",
            SamplingError::Failed(_) => "failed",
        }
    }
}
