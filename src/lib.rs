//! Locate the rows of a list-of-people screenshot and extract their usernames.
//!
//! Icon templates are matched across the screenshot, clustered into one
//! reference point per row, and each row's label rectangle is chosen by a
//! flatness probe before being handed to OCR.

pub mod config;
pub mod error;
pub mod extractor;
pub mod geometry;
pub mod ocr;
pub mod row_locator;
pub mod template;
pub mod template_matching;

pub use config::ExtractorConfig;
pub use error::{ExtractError, ExtractResult};
pub use extractor::{RowUsername, UsernameExtractor};
pub use geometry::{Point, Rect};
pub use row_locator::{LocatedRow, LocatorConfig, RowLocator};
pub use template::{ColorMode, IconTemplate};
