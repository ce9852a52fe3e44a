use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::CountingWriter;
use crate::engine::GeneratedSample;
use crate::errors::SamplingError;

/// Write samples as newline-delimited JSON, keys in sample insertion order.
pub fn write_samples_jsonl(path: &Path, samples: &[GeneratedSample]) -> Result<u64, SamplingError> {
    let mut writer = CountingWriter::new(BufWriter::new(File::create(path)?));
    for sample in samples {
        serde_json::to_writer(&mut writer, sample)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(writer.bytes_written())
}
