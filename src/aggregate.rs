use crate::error::PipelineError;
use crate::model::{CategoryRecord, CategoryTable, Dimension, Schema, Statistic};
use crate::stats::{WeightedStats, ratio_or_zero, round_to};
use crate::warning::{PipelineWarning, WarningCode, push_warning};

/// Precision of a rebuilt band proportion before scaling to percent.
const PROPORTION_DECIMALS: i32 = 4;
const TOTAL_DECIMALS: i32 = 2;

/// Leaf categories, in table order. Supercategories and placeholders are left out.
pub fn aggregation_set(table: &CategoryTable) -> Result<Vec<&CategoryRecord>, PipelineError> {
    let set = table
        .records
        .iter()
        .filter(|record| record.is_leaf())
        .collect::<Vec<_>>();
    if set.is_empty() {
        return Err(PipelineError::EmptyAggregationSet);
    }
    Ok(set)
}

/// Turns each band percentage back into an estimated respondent count,
/// `round(pct / 100 * N)` with the dimension's own `N`. Other columns are
/// copied unchanged.
#[must_use]
pub fn reconstruct_frequencies(record: &CategoryRecord, schema: &Schema) -> Vec<f64> {
    let mut values = record.values.clone();
    for dimension in Dimension::ALL {
        let columns = schema.dimension(dimension);
        let n = record.values[columns.n];
        for &band in &columns.bands {
            values[band] = round_to(record.values[band] / 100.0 * n, 0);
        }
    }
    values
}

/// Numeric fields of the synthesized total row.
#[derive(Debug, Clone, PartialEq)]
pub struct GrandTotal {
    pub values: Vec<f64>,
    /// Number of categories that contributed.
    pub aggregated: usize,
}

/// Builds the total row from leaf categories.
///
/// Band frequencies and `N` are summed, then band percentages are rebuilt
/// against the summed `N`. Mean and SD are the `N`-weighted mean and sample
/// standard deviation of the per-category means; the SD is therefore a spread
/// of category means, not of individual respondents.
pub fn synthesize_grand_total(
    table: &CategoryTable,
    warnings: &mut Vec<PipelineWarning>,
) -> Result<GrandTotal, PipelineError> {
    let schema = &table.schema;
    let set = aggregation_set(table)?;

    let mut values = vec![0.0; schema.width()];
    for record in &set {
        for (total, value) in values.iter_mut().zip(reconstruct_frequencies(record, schema)) {
            *total += value;
        }
    }

    for dimension in Dimension::ALL {
        let columns = schema.dimension(dimension);
        let stats = WeightedStats::from_pairs(set.iter().map(|record| {
            (
                record.statistic(schema, dimension, Statistic::Mean),
                record.statistic(schema, dimension, Statistic::N),
            )
        }));
        if stats.is_degenerate() {
            push_warning(
                warnings,
                PipelineWarning::new(
                    WarningCode::DegenerateWeight,
                    format!(
                        "total weight {} leaves no degrees of freedom; \
                         weighted results set to zero",
                        stats.sum_weights
                    ),
                )
                .with_dimension(dimension),
            );
        }

        let n = values[columns.n];
        for &band in &columns.bands {
            values[band] = round_to(ratio_or_zero(values[band], n), PROPORTION_DECIMALS) * 100.0;
        }
        values[columns.mean] = round_to(stats.mean, dimension.mean_decimals());
        values[columns.sd] = stats.std;
    }

    let means = Dimension::ALL.map(|dimension| schema.dimension(dimension).mean);
    for (index, value) in values.iter_mut().enumerate() {
        if !means.contains(&index) {
            *value = round_to(*value, TOTAL_DECIMALS);
        }
    }

    tracing::debug!(aggregated = set.len(), "synthesized grand total");

    Ok(GrandTotal {
        values,
        aggregated: set.len(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{aggregation_set, reconstruct_frequencies, synthesize_grand_total};
    use crate::error::PipelineError;
    use crate::model::{
        CategoryKind, CategoryRecord, CategoryTable, Dimension, RecordKind, Schema, Statistic,
    };
    use crate::warning::WarningCode;

    fn schema() -> Schema {
        let headers = [
            "Major", "VR: High", "VR: Low", "VR: Mean", "VR: SD", "VR: N", "QR: High", "QR: Low",
            "QR: Mean", "QR: SD", "QR: N", "AW: High", "AW: Low", "AW: Mean", "AW: SD", "AW: N",
        ]
        .map(str::to_string);
        Schema::from_headers(&headers).expect("schema should build")
    }

    fn record(code: &str, kind: CategoryKind, values: [f64; 15]) -> CategoryRecord {
        CategoryRecord {
            code: code.to_string(),
            name: format!("Category {code}"),
            kind: RecordKind::Category(kind),
            values: values.to_vec(),
        }
    }

    fn sample_table() -> CategoryTable {
        CategoryTable {
            schema: schema(),
            records: vec![
                record(
                    "01",
                    CategoryKind::Supercategory,
                    [
                        50.0, 50.0, 999.0, 99.0, 0.0, 50.0, 50.0, 999.0, 99.0, 0.0, 50.0, 50.0, 9.0,
                        9.0, 0.0,
                    ],
                ),
                record(
                    "02",
                    CategoryKind::Leaf,
                    [
                        40.0, 60.0, 150.0, 7.0, 100.0, 25.0, 75.0, 152.0, 8.0, 100.0, 10.0, 90.0,
                        3.5, 0.8, 100.0,
                    ],
                ),
                record(
                    "03",
                    CategoryKind::Leaf,
                    [
                        20.0, 80.0, 160.0, 6.0, 300.0, 50.0, 50.0, 156.0, 9.0, 300.0, 30.0, 70.0,
                        3.9, 0.9, 300.0,
                    ],
                ),
                record("04", CategoryKind::Leaf, [0.0; 15]),
                record(
                    "05",
                    CategoryKind::Placeholder,
                    [
                        100.0, 0.0, 140.0, 5.0, 5000.0, 100.0, 0.0, 140.0, 5.0, 5000.0, 100.0, 0.0,
                        2.0, 1.0, 5000.0,
                    ],
                ),
            ],
        }
    }

    #[test]
    fn aggregation_set_keeps_only_leaves() {
        let table = sample_table();
        let codes = aggregation_set(&table)
            .expect("set should not be empty")
            .iter()
            .map(|record| record.code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(codes, vec!["02", "03", "04"]);
    }

    #[test]
    fn empty_aggregation_set_is_fatal() {
        let mut table = sample_table();
        table.records.retain(|record| !record.is_leaf());
        let error = synthesize_grand_total(&table, &mut Vec::new())
            .expect_err("no leaves should fail");
        assert!(matches!(error, PipelineError::EmptyAggregationSet));
    }

    #[test]
    fn reconstructs_counts_with_each_dimensions_n() {
        let table = sample_table();
        let frequencies = reconstruct_frequencies(&table.records[2], &table.schema);
        assert_eq!(&frequencies[..2], &[60.0, 240.0]);
        assert_eq!(&frequencies[5..7], &[150.0, 150.0]);
        assert_eq!(frequencies[4], 300.0);
        assert_eq!(frequencies[2], 160.0);
    }

    #[test]
    fn reconstruction_rounds_half_to_even() {
        let schema = schema();
        let mut values = [0.0; 15];
        values[0] = 50.0;
        values[1] = 50.0;
        values[4] = 5.0;
        let frequencies =
            reconstruct_frequencies(&record("02", CategoryKind::Leaf, values), &schema);
        assert_eq!(&frequencies[..2], &[2.0, 2.0]);
    }

    #[test]
    fn total_row_is_weighted_by_n() {
        let table = sample_table();
        let mut warnings = Vec::new();
        let total = synthesize_grand_total(&table, &mut warnings).expect("total should build");
        let total_record = CategoryRecord {
            code: "06".to_string(),
            name: "GRAND TOTAL".to_string(),
            kind: RecordKind::GrandTotal,
            values: total.values.clone(),
        };
        let schema = &table.schema;

        assert_eq!(total.aggregated, 3);
        assert!(warnings.is_empty());

        assert_eq!(total_record.statistic(schema, Dimension::Verbal, Statistic::N), 400.0);
        assert_eq!(total_record.statistic(schema, Dimension::Verbal, Statistic::Mean), 157.5);
        assert_eq!(total_record.statistic(schema, Dimension::Verbal, Statistic::Sd), 4.34);
        // (40 + 60) / 400 and (60 + 240) / 400
        assert_eq!(
            total_record.bands(schema, Dimension::Verbal).collect::<Vec<_>>(),
            vec![25.0, 75.0]
        );

        assert_eq!(total_record.statistic(schema, Dimension::Quantitative, Statistic::Mean), 155.0);
        // (3.5 * 100 + 3.9 * 300) / 400 = 3.8
        assert_eq!(total_record.statistic(schema, Dimension::Writing, Statistic::Mean), 3.8);
        assert_eq!(
            total_record.bands(schema, Dimension::Writing).collect::<Vec<_>>(),
            vec![25.0, 75.0]
        );
    }

    #[test]
    fn all_zero_weights_recover_with_warning() {
        let table = CategoryTable {
            schema: schema(),
            records: vec![record("01", CategoryKind::Leaf, [0.0; 15])],
        };
        let mut warnings = Vec::new();
        let total = synthesize_grand_total(&table, &mut warnings).expect("total should build");

        assert!(total.values.iter().all(|value| *value == 0.0));
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|warning| warning.code == WarningCode::DegenerateWeight));
    }
}
