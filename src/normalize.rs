use crate::error::PipelineError;
use crate::layout::ReportLayout;
use crate::model::{
    AssembledTable, CategoryKind, CategoryRecord, CategoryTable, Column, ColumnRole, Dimension,
    RecordKind, Schema, Statistic, format_code,
};
use crate::warning::{PipelineWarning, WarningCode, push_warning};

/// Parses one numeric cell. Blank means "no respondents" and reads as 0.
fn parse_cell(column: &Column, category: &str, cell: &str) -> Result<f64, PipelineError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let digits = if column.is_count() {
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };

    let value = digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PipelineError::non_numeric_cell(&column.header, category, cell))?;

    if column.is_count() && (value < 0.0 || value.fract() != 0.0) {
        return Err(PipelineError::SchemaMismatch(format!(
            "column '{}' of category '{category}' is not a respondent count: '{cell}'",
            column.header
        )));
    }
    if matches!(column.role, ColumnRole::Band(_)) && value < 0.0 {
        return Err(PipelineError::SchemaMismatch(format!(
            "column '{}' of category '{category}' has a negative percentage: '{cell}'",
            column.header
        )));
    }

    Ok(value)
}

fn check_percent_sums(
    record: &CategoryRecord,
    schema: &Schema,
    tolerance: f64,
    warnings: &mut Vec<PipelineWarning>,
) {
    for dimension in Dimension::ALL {
        if record.statistic(schema, dimension, Statistic::N) == 0.0 {
            continue;
        }

        let total = record.bands(schema, dimension).sum::<f64>();
        if (total - 100.0).abs() > tolerance {
            push_warning(
                warnings,
                PipelineWarning::new(
                    WarningCode::PercentSumOutOfTolerance,
                    format!("score-band percentages sum to {total:.2}"),
                )
                .with_category(record.label())
                .with_dimension(dimension),
            );
        }
    }
}

/// Types every cell, assigns ordinal codes and group suffixes, and tags each
/// category's kind.
pub fn normalize_table(
    assembled: &AssembledTable,
    layout: &ReportLayout,
    warnings: &mut Vec<PipelineWarning>,
) -> Result<CategoryTable, PipelineError> {
    let schema = Schema::from_headers(&assembled.headers)?;

    let mut records = Vec::with_capacity(assembled.rows.len());
    for (index, row) in assembled.rows.iter().enumerate() {
        let Some((raw_name, cells)) = row.split_first() else {
            continue;
        };

        let position = index + 1;
        let code = format_code(position);
        let name = match layout.suffix_for(position) {
            Some(suffix) => format!("{raw_name} {suffix}"),
            None => raw_name.clone(),
        };
        let label = format!("{code}: {name}");

        let values = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(column_index, column)| {
                let cell = cells.get(column_index).map_or("", String::as_str);
                parse_cell(column, &label, cell)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let kind = layout.kind_of(&label);
        let record = CategoryRecord {
            code,
            name,
            kind: RecordKind::Category(kind),
            values,
        };
        if kind == CategoryKind::Leaf {
            check_percent_sums(&record, &schema, layout.percent_tolerance, warnings);
        }
        records.push(record);
    }

    tracing::debug!(
        categories = records.len(),
        leaves = records.iter().filter(|record| record.is_leaf()).count(),
        "normalized category table"
    );

    Ok(CategoryTable { schema, records })
}
