use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::PipelineError;
use crate::model::MergedOutput;

fn write_records<W: Write>(
    sink: W,
    merged: &MergedOutput,
    delimiter: u8,
) -> Result<W, PipelineError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(sink);
    writer.write_record(&merged.headers)?;
    for row in &merged.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|error| PipelineError::Io(error.into_error()))
}

pub(crate) fn write_csv(
    path: &Path,
    merged: &MergedOutput,
    delimiter: u8,
) -> Result<(), PipelineError> {
    let file = File::create(path)?;
    write_records(file, merged, delimiter)?.sync_all()?;
    Ok(())
}

pub(crate) fn write_csv_to_string(
    merged: &MergedOutput,
    delimiter: u8,
) -> Result<String, PipelineError> {
    let bytes = write_records(Vec::new(), merged, delimiter)?;
    String::from_utf8(bytes).map_err(|error| {
        PipelineError::SchemaMismatch(format!("CSV output is not valid UTF-8: {error}"))
    })
}
