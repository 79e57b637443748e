/// Template matching module for locating repeated icons in screenshots
///
/// This module provides multi-instance template matching with:
/// - Several correlation and squared-error similarity measures (via imageproc)
/// - Per-channel scoring for color screenshots
/// - Non-maximum suppression so accepted matches never overlap
pub mod matcher;
pub mod types;

pub use matcher::TemplateMatcher;
pub use types::{Match, MatchMethod};
