//! Text recognition on label crops
//!
//! The OCR engine is an external collaborator: anything that turns an image
//! crop into lines of text can drive username extraction.

pub mod tesseract;

pub use tesseract::{TesseractCli, TesseractConfig};

use crate::error::{ExtractError, ExtractResult};
use image::DynamicImage;

/// Recognizes text lines in an image crop
pub trait TextRecognizer {
    fn recognize(&self, crop: &DynamicImage) -> ExtractResult<Vec<String>>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, crop: &DynamicImage) -> ExtractResult<Vec<String>> {
        (**self).recognize(crop)
    }
}

/// Accept OCR output only when it holds exactly one non-empty line
pub fn single_line(lines: Vec<String>) -> ExtractResult<String> {
    let mut lines: Vec<String> = lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() == 1 {
        return Ok(lines.remove(0));
    }
    Err(ExtractError::AmbiguousOcrResult { lines })
}
