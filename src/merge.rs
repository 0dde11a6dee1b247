use crate::aggregate::GrandTotal;
use crate::layout::{ReferencePopulation, ReportLayout};
use crate::model::{
    CategoryRecord, CategoryTable, Dimension, MergedOutput, RecordKind, Schema, format_code,
};

fn reference_record(
    schema: &Schema,
    reference: &ReferencePopulation,
    code: String,
) -> CategoryRecord {
    let mut values = vec![0.0; schema.width()];
    for dimension in Dimension::ALL {
        let columns = schema.dimension(dimension);
        let summary = reference.summary(dimension);
        values[columns.mean] = summary.mean;
        values[columns.sd] = summary.sd;
        values[columns.n] = summary.n;
    }

    CategoryRecord {
        code,
        name: reference.label.clone(),
        kind: RecordKind::Reference,
        values,
    }
}

/// Appends the total row and the reference-population row to the full
/// category table, excluded categories included.
#[must_use]
pub fn merge_tables(
    normalized: &CategoryTable,
    total: GrandTotal,
    layout: &ReportLayout,
) -> CategoryTable {
    let mut records = normalized.records.clone();

    records.push(CategoryRecord {
        code: format_code(records.len() + 1),
        name: layout.total_label.clone(),
        kind: RecordKind::GrandTotal,
        values: total.values,
    });

    let reference_code = format_code(records.len() + 1);
    records.push(reference_record(
        &normalized.schema,
        &layout.reference_population,
        reference_code,
    ));

    CategoryTable {
        schema: normalized.schema.clone(),
        records,
    }
}

/// Renders a float the way a float column prints.
///
/// Magnitudes in `[1e-4, 1e16)` use the shortest round-trip decimal form and
/// integral values keep `.0` (`400.0`). Outside that range the value switches
/// to scientific notation with a signed, two-digit exponent (`5e-05`,
/// `1.5e+16`). Zero of either sign renders as `0.0`.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    if (1e-4..1e16).contains(&value.abs()) {
        // Debug keeps the trailing `.0` that Display drops.
        return format!("{value:?}");
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Stringifies the final table for persistence.
#[must_use]
pub fn to_output(table: &CategoryTable) -> MergedOutput {
    let rows = table
        .records
        .iter()
        .map(|record| {
            std::iter::once(record.label())
                .chain(record.values.iter().copied().map(format_value))
                .collect()
        })
        .collect();

    MergedOutput {
        headers: table.schema.headers(),
        rows,
    }
}
