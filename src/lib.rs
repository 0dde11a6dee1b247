mod aggregate;
mod assemble;
mod csv_out;
mod error;
mod header;
mod input;
mod layout;
mod merge;
mod model;
mod normalize;
mod stats;
mod warning;

use std::path::Path;

use serde::Serialize;

use crate::csv_out::{write_csv, write_csv_to_string};

pub use aggregate::{GrandTotal, aggregation_set, reconstruct_frequencies, synthesize_grand_total};
pub use assemble::assemble_grids;
pub use error::PipelineError;
pub use input::{load_grids, load_layout, parse_grids};
pub use layout::{DimensionSummary, GroupSuffix, ReferencePopulation, ReportLayout};
pub use merge::{format_value, merge_tables, to_output};
pub use model::{
    AssembledTable, CategoryKind, CategoryRecord, CategoryTable, Column, ColumnRole, Dimension,
    DimensionColumns, MergedOutput, RawGrid, RecordKind, Schema, Statistic,
};
pub use normalize::normalize_table;
pub use stats::{WeightedStats, round_to};
pub use warning::{PipelineWarning, WarningCode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Rows in the final table, total and reference rows included.
    pub row_count: usize,
    pub category_count: usize,
    pub aggregated_count: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Runs every stage and returns the final table: all categories in source
/// order, then the grand total, then the reference population.
pub fn build_table(
    pages: &[RawGrid],
    layout: &ReportLayout,
) -> Result<(CategoryTable, PipelineReport), PipelineError> {
    layout.validate()?;

    let mut warnings = Vec::new();
    let assembled = assemble_grids(pages, layout, &mut warnings)?;
    let normalized = normalize_table(&assembled, layout, &mut warnings)?;
    let total = synthesize_grand_total(&normalized, &mut warnings)?;
    let aggregated_count = total.aggregated;
    let merged = merge_tables(&normalized, total, layout);

    let report = PipelineReport {
        row_count: merged.records.len(),
        category_count: normalized.records.len(),
        aggregated_count,
        warnings,
    };
    tracing::info!(
        rows = report.row_count,
        categories = report.category_count,
        aggregated = report.aggregated_count,
        warnings = report.warnings.len(),
        "score table built"
    );

    Ok((merged, report))
}

pub fn convert_grids_to_csv_string(
    pages: &[RawGrid],
    layout: &ReportLayout,
    delimiter: u8,
) -> Result<(String, PipelineReport), PipelineError> {
    let (table, report) = build_table(pages, layout)?;
    let csv = write_csv_to_string(&to_output(&table), delimiter)?;
    Ok((csv, report))
}

/// Builds the table and writes it to `output_csv`. Nothing is written when
/// any stage fails.
pub fn convert_grids_to_csv(
    pages: &[RawGrid],
    output_csv: &Path,
    layout: &ReportLayout,
    delimiter: u8,
) -> Result<PipelineReport, PipelineError> {
    let (table, report) = build_table(pages, layout)?;
    write_csv(output_csv, &to_output(&table), delimiter)?;
    Ok(report)
}
