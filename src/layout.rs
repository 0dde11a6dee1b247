//! Fixed-position knowledge about the source report.
//!
//! Everything that depends on where a category sits in the printed table lives
//! here, so a change in the report's layout only touches this configuration.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::{CategoryKind, Dimension};

/// Suffix appended to every category whose code falls in `first..=last`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSuffix {
    pub first: usize,
    pub last: usize,
    pub suffix: String,
}

impl GroupSuffix {
    #[must_use]
    pub fn new(first: usize, last: usize, suffix: impl Into<String>) -> Self {
        Self {
            first,
            last,
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        (self.first..=self.last).contains(&position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionSummary {
    pub mean: f64,
    pub sd: f64,
    pub n: f64,
}

impl DimensionSummary {
    #[must_use]
    pub const fn new(mean: f64, sd: f64, n: f64) -> Self {
        Self { mean, sd, n }
    }
}

/// Externally published statistics for the whole test-taking population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePopulation {
    pub label: String,
    pub verbal: DimensionSummary,
    pub quantitative: DimensionSummary,
    pub writing: DimensionSummary,
}

impl ReferencePopulation {
    #[must_use]
    pub fn summary(&self, dimension: Dimension) -> DimensionSummary {
        match dimension {
            Dimension::Verbal => self.verbal,
            Dimension::Quantitative => self.quantitative,
            Dimension::Writing => self.writing,
        }
    }
}

impl Default for ReferencePopulation {
    fn default() -> Self {
        Self {
            label: "ETS-Provided Population".to_string(),
            verbal: DimensionSummary::new(151.29, 8.27, 1_039_310.0),
            quantitative: DimensionSummary::new(156.93, 9.89, 1_041_330.0),
            writing: DimensionSummary::new(3.49, 0.88, 1_037_639.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Minimum number of extracted pages.
    pub expected_pages: usize,
    /// Minimum number of distinct category rows.
    pub expected_categories: usize,
    pub group_suffixes: Vec<GroupSuffix>,
    /// Coded labels (`"01: LIFE SCIENCES"`) of roll-up headings.
    pub supercategories: Vec<String>,
    /// Coded labels of "other" buckets.
    pub placeholders: Vec<String>,
    pub total_label: String,
    /// Allowed distance of a leaf's band percentages from 100.
    pub percent_tolerance: f64,
    pub reference_population: ReferencePopulation,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            expected_pages: 4,
            expected_categories: 60,
            group_suffixes: vec![
                GroupSuffix::new(13, 18, "Engineering"),
                GroupSuffix::new(38, 39, "Education"),
                GroupSuffix::new(41, 43, "Education"),
            ],
            supercategories: [
                "01: LIFE SCIENCES",
                "05: PHYSICAL SCIENCES",
                "12: ENGINEERING",
                "20: SOC. & BEHAVIORAL SCI.",
                "27: HUMANITIES & ARTS",
                "35: EDUCATION",
                "46: BUSINESS",
            ]
            .map(str::to_string)
            .to_vec(),
            placeholders: ["52: OTHER FIELDS", "60: Other Fields, Other*"]
                .map(str::to_string)
                .to_vec(),
            total_label: "GRAND TOTAL".to_string(),
            percent_tolerance: 0.5,
            reference_population: ReferencePopulation::default(),
        }
    }
}

impl ReportLayout {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.expected_pages == 0 {
            return Err(PipelineError::InvalidLayout(
                "expected_pages must be at least 1".to_string(),
            ));
        }

        for range in &self.group_suffixes {
            if range.first == 0 || range.last < range.first {
                return Err(PipelineError::InvalidLayout(format!(
                    "group suffix range {}..={} is empty or not 1-based",
                    range.first, range.last
                )));
            }
            if range.suffix.trim().is_empty() {
                return Err(PipelineError::InvalidLayout(format!(
                    "group suffix range {}..={} has an empty suffix",
                    range.first, range.last
                )));
            }
        }

        if !self.percent_tolerance.is_finite() || self.percent_tolerance < 0.0 {
            return Err(PipelineError::InvalidLayout(
                "percent_tolerance must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }

    /// Group suffix for the category at 1-based `position`, first match wins.
    #[must_use]
    pub fn suffix_for(&self, position: usize) -> Option<&str> {
        self.group_suffixes
            .iter()
            .find(|range| range.contains(position))
            .map(|range| range.suffix.as_str())
    }

    #[must_use]
    pub fn kind_of(&self, label: &str) -> CategoryKind {
        if self.supercategories.iter().any(|entry| entry == label) {
            CategoryKind::Supercategory
        } else if self.placeholders.iter().any(|entry| entry == label) {
            CategoryKind::Placeholder
        } else {
            CategoryKind::Leaf
        }
    }
}
