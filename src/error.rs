use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("extraction incomplete: {0}")]
    ExtractionIncomplete(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("aggregation set is empty: every category is a supercategory or placeholder")]
    EmptyAggregationSet,

    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

impl PipelineError {
    pub(crate) fn non_numeric_cell(column: &str, category: &str, value: &str) -> Self {
        Self::SchemaMismatch(format!(
            "column '{column}' of category '{category}' is not numeric: '{value}'"
        ))
    }
}
