/// Template matching data types
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Similarity measure used to score every template placement.
///
/// Scores are always compared "higher is better": squared-error maps are
/// negated internally, and their threshold is read as a maximum error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Raw sum of squared differences (lower is better natively)
    SumOfSquaredErrors,
    /// Sum of squared differences divided by the template/window energy
    SumOfSquaredErrorsNormalized,
    /// Raw sum of products
    CrossCorrelation,
    /// Sum of products divided by the template/window energy, in [0, 1]
    CrossCorrelationNormalized,
    /// Zero-mean normalized cross correlation, in [-1, 1]
    #[default]
    CorrelationCoefficientNormalized,
}

impl MatchMethod {
    /// Whether the native score of this method is an error (lower is better).
    pub fn is_error_measure(self) -> bool {
        matches!(
            self,
            MatchMethod::SumOfSquaredErrors | MatchMethod::SumOfSquaredErrorsNormalized
        )
    }

    /// Convert a native-range threshold to the "higher is better" scale.
    pub(crate) fn normalized_threshold(self, threshold: f32) -> f32 {
        if self.is_error_measure() {
            -threshold
        } else {
            threshold
        }
    }

    /// Convert a "higher is better" score back to the native range.
    pub(crate) fn native_score(self, score: f32) -> f32 {
        if self.is_error_measure() { -score } else { score }
    }
}

/// A single accepted placement of a template
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Template-sized rectangle in the search image
    pub rect: Rect,
    /// Score in the method's native range
    pub score: f32,
}

impl Match {
    /// Format match with its position and score
    pub fn describe(&self, template_name: &str) -> String {
        format!(
            "{} at ({},{}) score={:.4}",
            template_name, self.rect.min.x, self.rect.min.y, self.score
        )
    }
}
