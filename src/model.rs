use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// One extracted page: rows of text cells, header row first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGrid {
    pub rows: Vec<Vec<String>>,
}

impl RawGrid {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

impl From<Vec<Vec<String>>> for RawGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Concatenated pages with the header row promoted and cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Verbal,
    Quantitative,
    Writing,
}

impl Dimension {
    pub const ALL: [Self; 3] = [Self::Verbal, Self::Quantitative, Self::Writing];

    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Verbal => "VR",
            Self::Quantitative => "QR",
            Self::Writing => "AW",
        }
    }

    /// Decimal places the source report uses for this dimension's mean.
    #[must_use]
    pub const fn mean_decimals(self) -> i32 {
        match self {
            Self::Verbal | Self::Quantitative => 1,
            Self::Writing => 2,
        }
    }

    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dimension| dimension.prefix() == prefix)
    }

    const fn index(self) -> usize {
        match self {
            Self::Verbal => 0,
            Self::Quantitative => 1,
            Self::Writing => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Sd,
    N,
}

impl Statistic {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "Mean" => Some(Self::Mean),
            "SD" => Some(Self::Sd),
            "N" => Some(Self::N),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Share of the dimension's respondents in one score band, in percent.
    Band(Dimension),
    Statistic(Dimension, Statistic),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub role: ColumnRole,
}

impl Column {
    #[must_use]
    pub fn is_count(&self) -> bool {
        matches!(self.role, ColumnRole::Statistic(_, Statistic::N))
    }
}

/// Positions of one dimension's columns within [`CategoryRecord::values`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionColumns {
    pub bands: Vec<usize>,
    pub mean: usize,
    pub sd: usize,
    pub n: usize,
}

impl DimensionColumns {
    #[must_use]
    pub fn statistic(&self, statistic: Statistic) -> usize {
        match statistic {
            Statistic::Mean => self.mean,
            Statistic::Sd => self.sd,
            Statistic::N => self.n,
        }
    }
}

/// Column layout of a category table, resolved from header names.
///
/// The label column comes first and is not part of [`Schema::columns`]; every
/// other header must read `"<prefix>: <rest>"` where `<rest>` is `Mean`, `SD`,
/// `N` or a score-band name. Column order is kept exactly as extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    label_header: String,
    columns: Vec<Column>,
    dimensions: Vec<DimensionColumns>,
}

impl Schema {
    pub fn from_headers(headers: &[String]) -> Result<Self, PipelineError> {
        let Some((label_header, numeric_headers)) = headers.split_first() else {
            return Err(PipelineError::SchemaMismatch(
                "header row is empty".to_string(),
            ));
        };

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(numeric_headers.len());
        let mut bands: [Vec<usize>; 3] = Default::default();
        let mut statistics: [[Option<usize>; 3]; 3] = [[None; 3]; 3];

        for (index, header) in numeric_headers.iter().enumerate() {
            if !seen.insert(header.as_str()) {
                return Err(PipelineError::SchemaMismatch(format!(
                    "duplicate column header '{header}'"
                )));
            }

            let (prefix, rest) = header.split_once(": ").ok_or_else(|| {
                PipelineError::SchemaMismatch(format!(
                    "column header '{header}' has no dimension prefix"
                ))
            })?;
            let dimension = Dimension::from_prefix(prefix).ok_or_else(|| {
                PipelineError::SchemaMismatch(format!(
                    "column header '{header}' uses unknown dimension prefix '{prefix}'"
                ))
            })?;

            let role = match Statistic::from_suffix(rest) {
                Some(statistic) => {
                    let slot = &mut statistics[dimension.index()][statistic as usize];
                    if slot.is_some() {
                        return Err(PipelineError::SchemaMismatch(format!(
                            "dimension {} has more than one '{rest}' column",
                            dimension.prefix()
                        )));
                    }
                    *slot = Some(index);
                    ColumnRole::Statistic(dimension, statistic)
                }
                None => {
                    bands[dimension.index()].push(index);
                    ColumnRole::Band(dimension)
                }
            };

            columns.push(Column {
                header: header.clone(),
                role,
            });
        }

        let mut dimensions = Vec::with_capacity(Dimension::ALL.len());
        for dimension in Dimension::ALL {
            let [mean, sd, n] = statistics[dimension.index()];
            let missing = |name: &str| {
                PipelineError::SchemaMismatch(format!(
                    "dimension {} has no '{}: {name}' column",
                    dimension.prefix(),
                    dimension.prefix()
                ))
            };
            let band_columns = std::mem::take(&mut bands[dimension.index()]);
            if band_columns.is_empty() {
                return Err(PipelineError::SchemaMismatch(format!(
                    "dimension {} has no score-band columns",
                    dimension.prefix()
                )));
            }
            dimensions.push(DimensionColumns {
                bands: band_columns,
                mean: mean.ok_or_else(|| missing("Mean"))?,
                sd: sd.ok_or_else(|| missing("SD"))?,
                n: n.ok_or_else(|| missing("N"))?,
            });
        }

        Ok(Self {
            label_header: label_header.clone(),
            columns,
            dimensions,
        })
    }

    #[must_use]
    pub fn label_header(&self) -> &str {
        &self.label_header
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of numeric columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> &DimensionColumns {
        &self.dimensions[dimension.index()]
    }

    #[must_use]
    pub fn index_of(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.header == header)
    }

    /// Full header row: label column first, then numeric columns in order.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(self.label_header.clone())
            .chain(self.columns.iter().map(|column| column.header.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Has its own respondents and takes part in aggregation.
    Leaf,
    /// Roll-up heading; shown but never aggregated.
    Supercategory,
    /// "Other" bucket of unknown composition; shown but never aggregated.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Category(CategoryKind),
    GrandTotal,
    Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    /// Two-digit ordinal, fixed once assigned.
    pub code: String,
    pub name: String,
    pub kind: RecordKind,
    /// One value per [`Schema::columns`] entry.
    pub values: Vec<f64>,
}

impl CategoryRecord {
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.code, self.name)
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.kind == RecordKind::Category(CategoryKind::Leaf)
    }

    #[must_use]
    pub fn statistic(&self, schema: &Schema, dimension: Dimension, statistic: Statistic) -> f64 {
        self.values[schema.dimension(dimension).statistic(statistic)]
    }

    #[must_use]
    pub fn bands<'a>(
        &'a self,
        schema: &'a Schema,
        dimension: Dimension,
    ) -> impl Iterator<Item = f64> + 'a {
        schema
            .dimension(dimension)
            .bands
            .iter()
            .map(|&index| self.values[index])
    }
}

/// Zero-padded two-digit code for a 1-based position.
#[must_use]
pub fn format_code(position: usize) -> String {
    format!("{position:02}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    pub schema: Schema,
    pub records: Vec<CategoryRecord>,
}

/// Stringified table handed to the CSV writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOutput {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
