use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::CountingWriter;
use crate::engine::GeneratedSample;

const HEADER: [&str; 4] = ["component", "index", "class", "text"];

/// Write rendered samples as CSV, one row per sample in generation order.
pub fn write_samples_csv(path: &Path, samples: &[GeneratedSample]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(HEADER)?;
    for sample in samples {
        let index = sample.index.to_string();
        writer.write_record([
            sample.component.as_str(),
            index.as_str(),
            sample.class.as_str(),
            sample.text.as_str(),
        ])?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}
