//! Configuration for locating list rows and their label rectangles

use crate::error::{ExtractError, ExtractResult};
use crate::geometry::{Point, Rect};
use crate::template_matching::MatchMethod;
use serde::{Deserialize, Serialize};

/// Candidate label rectangles, relative to a row's reference point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRects {
    /// Tested for flatness to decide which layout the row uses
    pub probe: Rect,
    /// Label position when the probe is flat (no secondary status line)
    pub primary: Rect,
    /// Label position when the probe has content
    pub fallback: Rect,
}

impl LabelRects {
    /// Build offsets from rectangles measured on a sample screenshot
    ///
    /// `reference` is the reference point of the sampled row in that same
    /// screenshot; every rectangle is made relative to it.
    pub fn from_sample(reference: Point, probe: Rect, primary: Rect, fallback: Rect) -> Self {
        Self {
            probe: probe.sub(reference),
            primary: primary.sub(reference),
            fallback: fallback.sub(reference),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Area where icon match origins are trusted (inclusive bounds)
    pub search_rect: Rect,
    /// X coordinate shared by every reference point
    pub reference_x: i32,
    /// Largest Y distance between neighbouring matches of the same row
    pub max_gap: i32,
    /// Inclusive match threshold, in the method's native range
    pub match_threshold: f32,
    /// Similarity measure for icon matching
    pub match_method: MatchMethod,
    /// Largest per-channel difference still considered flat
    pub uniformity_tolerance: i32,
    /// Label candidates, relative to the reference point
    pub labels: LabelRects,
    /// Treat a screenshot without any row as an error
    pub require_rows: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self::iphone_14_plus()
    }
}

impl LocatorConfig {
    /// Calibrated on an iPhone 14 Plus followers list at default font size
    pub fn iphone_14_plus() -> Self {
        Self {
            search_rect: Rect::new(600, 308, 675, 1690),
            reference_x: 629,
            max_gap: 10,
            match_threshold: 0.8,
            match_method: MatchMethod::CorrelationCoefficientNormalized,
            uniformity_tolerance: 5,
            labels: LabelRects::from_sample(
                Point::new(629, 501),
                Rect::from_xywh(165, 482, 440, 36),
                Rect::from_xywh(165, 518, 440, 36),
                Rect::from_xywh(165, 498, 440, 36),
            ),
            require_rows: false,
        }
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> ExtractResult<()> {
        if self.search_rect.is_empty() {
            return Err(ExtractError::config(format!(
                "search_rect {} has no area",
                self.search_rect
            )));
        }
        if self.max_gap < 0 {
            return Err(ExtractError::config(format!(
                "max_gap must be non-negative, got {}",
                self.max_gap
            )));
        }
        if self.uniformity_tolerance < 0 {
            return Err(ExtractError::config(format!(
                "uniformity_tolerance must be non-negative, got {}",
                self.uniformity_tolerance
            )));
        }
        if !self.match_threshold.is_finite() {
            return Err(ExtractError::config(format!(
                "match_threshold must be finite, got {}",
                self.match_threshold
            )));
        }
        if self.match_method.is_error_measure() && self.match_threshold < 0.0 {
            return Err(ExtractError::config(format!(
                "match_threshold is a maximum error for {:?} and must be non-negative, got {}",
                self.match_method, self.match_threshold
            )));
        }
        for (name, rect) in [
            ("probe", self.labels.probe),
            ("primary", self.labels.primary),
            ("fallback", self.labels.fallback),
        ] {
            if rect.is_empty() {
                return Err(ExtractError::config(format!(
                    "{name} label rectangle {rect} has no area"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iphone_14_plus_preset_is_the_default() {
        let preset = LocatorConfig::iphone_14_plus();
        assert!(preset.validate().is_ok());
        assert_eq!(preset.search_rect, Rect::new(600, 308, 675, 1690));
        assert_eq!(preset.reference_x, 629);
        assert_eq!(preset.labels.primary, Rect::from_xywh(165, 518, 440, 36).sub(Point::new(629, 501)));
        assert_eq!(preset, LocatorConfig::default());
    }

    #[test]
    fn test_default_is_valid() {
        let config = LocatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.labels.probe, Rect::new(-464, -19, -24, 17));
        assert_eq!(config.labels.primary, Rect::new(-464, 17, -24, 53));
        assert_eq!(config.labels.fallback, Rect::new(-464, -3, -24, 33));
    }

    #[test]
    fn test_rejects_negative_thresholds() {
        let config = LocatorConfig {
            max_gap: -1,
            ..LocatorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ExtractError::Config { .. })));

        let config = LocatorConfig {
            uniformity_tolerance: -3,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LocatorConfig {
            match_method: MatchMethod::SumOfSquaredErrors,
            match_threshold: -0.5,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_correlation_threshold_may_be_negative() {
        let config = LocatorConfig {
            match_threshold: -0.2,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_rects_and_nan() {
        let mut config = LocatorConfig::default();
        config.labels.primary = Rect::from_xywh(0, 0, 0, 10);
        assert!(config.validate().is_err());

        let config = LocatorConfig {
            search_rect: Rect::from_xywh(10, 10, 50, 0),
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LocatorConfig {
            match_threshold: f32::NAN,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LocatorConfig = toml::from_str(
            r#"
            reference_x = 700
            match_method = "cross_correlation_normalized"

            [search_rect]
            min = { x = 650, y = 300 }
            max = { x = 720, y = 2000 }
            "#,
        )
        .unwrap();

        assert_eq!(config.reference_x, 700);
        assert_eq!(config.match_method, MatchMethod::CrossCorrelationNormalized);
        assert_eq!(config.search_rect, Rect::new(650, 300, 720, 2000));
        assert_eq!(config.max_gap, 10);
        assert_eq!(config.labels, LocatorConfig::default().labels);
    }
}
