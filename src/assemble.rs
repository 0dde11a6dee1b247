use std::collections::HashSet;

use crate::error::PipelineError;
use crate::header::{clean_header, clean_label};
use crate::layout::ReportLayout;
use crate::model::{AssembledTable, RawGrid};
use crate::warning::{PipelineWarning, WarningCode, push_warning};

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn normalize_row(row: &[String], width: usize) -> Vec<String> {
    let mut out = row.iter().map(|cell| cell.trim().to_string()).collect::<Vec<_>>();
    out.resize(width, String::new());
    out
}

/// Stacks page grids row-wise into one table with a cleaned header row.
///
/// The first row of the first page becomes the header; the first row of every
/// later page repeats it and is dropped. Data rows keep page order and row
/// order, and a row whose leading cell was already seen is dropped in favour
/// of the first occurrence.
pub fn assemble_grids(
    pages: &[RawGrid],
    layout: &ReportLayout,
    warnings: &mut Vec<PipelineWarning>,
) -> Result<AssembledTable, PipelineError> {
    if pages.len() < layout.expected_pages {
        return Err(PipelineError::ExtractionIncomplete(format!(
            "expected {} pages, got {}",
            layout.expected_pages,
            pages.len()
        )));
    }

    if let Some(index) = pages.iter().position(|page| page.rows.len() < 2) {
        return Err(PipelineError::ExtractionIncomplete(format!(
            "page {} yielded no data rows",
            index + 1
        )));
    }

    let raw_headers = &pages[0].rows[0];
    if raw_headers.is_empty() {
        return Err(PipelineError::SchemaMismatch(
            "header row on page 1 is empty".to_string(),
        ));
    }
    let width = pages
        .iter()
        .flat_map(|page| page.rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    if raw_headers.len() < width {
        return Err(PipelineError::SchemaMismatch(format!(
            "header row has {} cells but data rows have up to {width}",
            raw_headers.len()
        )));
    }

    let headers = raw_headers
        .iter()
        .map(|cell| clean_header(cell))
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for (page_index, page) in pages.iter().enumerate() {
        let mut contributed = 0_usize;
        for row in page.rows.iter().skip(1) {
            if is_blank_row(row) {
                push_warning(
                    warnings,
                    PipelineWarning::new(
                        WarningCode::BlankRowDropped,
                        format!("dropped blank row on page {}", page_index + 1),
                    ),
                );
                continue;
            }

            contributed += 1;
            let key = row.first().map_or("", String::as_str);
            if !seen.insert(key) {
                push_warning(
                    warnings,
                    PipelineWarning::new(
                        WarningCode::DuplicateRowDropped,
                        format!("dropped repeated row on page {}", page_index + 1),
                    )
                    .with_category(clean_label(key)),
                );
                continue;
            }

            let mut normalized = normalize_row(row, headers.len());
            normalized[0] = clean_label(&normalized[0]);
            rows.push(normalized);
        }

        if contributed == 0 {
            return Err(PipelineError::ExtractionIncomplete(format!(
                "page {} yielded no data rows",
                page_index + 1
            )));
        }
    }

    if rows.len() < layout.expected_categories {
        return Err(PipelineError::ExtractionIncomplete(format!(
            "expected {} categories, got {}",
            layout.expected_categories,
            rows.len()
        )));
    }
    if rows.len() > layout.expected_categories {
        push_warning(
            warnings,
            PipelineWarning::new(
                WarningCode::UnexpectedRowCount,
                format!(
                    "expected {} categories, got {}; positional suffixes may be misaligned",
                    layout.expected_categories,
                    rows.len()
                ),
            ),
        );
    }

    tracing::debug!(
        pages = pages.len(),
        columns = headers.len(),
        rows = rows.len(),
        "assembled page grids"
    );

    Ok(AssembledTable { headers, rows })
}
