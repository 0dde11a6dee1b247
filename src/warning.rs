use serde::Serialize;

use crate::model::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    DuplicateRowDropped,
    BlankRowDropped,
    UnexpectedRowCount,
    PercentSumOutOfTolerance,
    DegenerateWeight,
}

/// A recoverable finding. Fatal conditions are [`crate::PipelineError`]s instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineWarning {
    pub code: WarningCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
}

impl PipelineWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            category: None,
            dimension: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }
}

/// Records `warning` and mirrors it to the log.
pub(crate) fn push_warning(warnings: &mut Vec<PipelineWarning>, warning: PipelineWarning) {
    tracing::warn!(
        code = ?warning.code,
        category = warning.category.as_deref().unwrap_or(""),
        dimension = warning.dimension.map_or("", Dimension::prefix),
        "{}",
        warning.message
    );
    warnings.push(warning);
}
