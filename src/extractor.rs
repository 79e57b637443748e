//! Username extraction: located rows plus OCR on each label crop

use crate::error::{ExtractError, ExtractResult};
use crate::geometry::Rect;
use crate::ocr::{TextRecognizer, single_line};
use crate::row_locator::{LocatedRow, RowLocator};
use crate::template::{ColorMode, IconTemplate};
use image::DynamicImage;

/// Text extraction outcome for one row
#[derive(Debug)]
pub struct RowUsername {
    pub row: LocatedRow,
    /// OCR failures stay local to the row
    pub username: ExtractResult<String>,
}

pub struct UsernameExtractor<R> {
    locator: RowLocator,
    recognizer: R,
    ocr_color_mode: ColorMode,
}

impl<R: TextRecognizer> UsernameExtractor<R> {
    pub fn new(locator: RowLocator, recognizer: R) -> Self {
        Self {
            locator,
            recognizer,
            ocr_color_mode: ColorMode::Gray,
        }
    }

    /// Pixel layout of the crops handed to the recognizer
    pub fn with_ocr_color_mode(mut self, mode: ColorMode) -> Self {
        self.ocr_color_mode = mode;
        self
    }

    pub fn locator(&self) -> &RowLocator {
        &self.locator
    }

    /// Locate rows and read the label of each one
    ///
    /// Row location failures abort the whole screenshot, as do recognizer
    /// failures that are not specific to one row (I/O). A row whose label
    /// cannot be read carries its own error and the other rows still go through.
    pub fn extract(
        &self,
        screenshot: &DynamicImage,
        templates: &[IconTemplate],
    ) -> ExtractResult<Vec<RowUsername>> {
        let rows = self.locator.locate_rows(screenshot, templates)?;

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                let username = match self.read_label(screenshot, &row.label) {
                    Ok(name) => {
                        log::debug!("row {i}: '{name}'");
                        Ok(name)
                    }
                    Err(e) if e.is_row_recoverable() => {
                        log::warn!("row {i} at {}: {e}", row.reference);
                        Err(e)
                    }
                    Err(e) => return Err(e),
                };
                Ok(RowUsername { row, username })
            })
            .collect()
    }

    /// Strict variant: every row must yield exactly one username
    pub fn usernames(
        &self,
        screenshot: &DynamicImage,
        templates: &[IconTemplate],
    ) -> ExtractResult<Vec<String>> {
        self.extract(screenshot, templates)?
            .into_iter()
            .map(|row| row.username)
            .collect()
    }

    fn read_label(&self, screenshot: &DynamicImage, label: &Rect) -> ExtractResult<String> {
        let crop = crop_label(screenshot, label)?;
        let lines = self.recognizer.recognize(&self.ocr_color_mode.apply(crop))?;
        single_line(lines)
    }
}

/// Crop a label rectangle, clipped to the screenshot
fn crop_label(screenshot: &DynamicImage, label: &Rect) -> ExtractResult<DynamicImage> {
    let bounds = Rect::from_xywh(0, 0, screenshot.width() as i32, screenshot.height() as i32);
    let clipped = label.intersect(&bounds);
    if clipped.is_empty() {
        return Err(ExtractError::Ocr {
            reason: format!("label {label} lies outside the screenshot"),
        });
    }
    Ok(screenshot.crop_imm(
        clipped.min.x as u32,
        clipped.min.y as u32,
        clipped.width() as u32,
        clipped.height() as u32,
    ))
}
