use std::fs;
use std::path::Path;

use crate::error::PipelineError;
use crate::layout::ReportLayout;
use crate::model::RawGrid;

/// Reads extracted pages: a JSON array of pages, each an array of rows of cells.
pub fn load_grids(path: &Path) -> Result<Vec<RawGrid>, PipelineError> {
    let data = fs::read_to_string(path)?;
    parse_grids(&data)
}

pub fn parse_grids(data: &str) -> Result<Vec<RawGrid>, PipelineError> {
    let pages = serde_json::from_str::<Vec<RawGrid>>(data)?;
    tracing::debug!(pages = pages.len(), "loaded extracted page grids");
    Ok(pages)
}

/// Reads a layout file; omitted fields keep their defaults.
pub fn load_layout(path: &Path) -> Result<ReportLayout, PipelineError> {
    let data = fs::read_to_string(path)?;
    let layout = serde_json::from_str::<ReportLayout>(&data)?;
    layout.validate()?;
    Ok(layout)
}
