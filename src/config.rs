//! Whole-tool configuration, loaded from TOML

use crate::error::ExtractResult;
use crate::ocr::TesseractConfig;
use crate::row_locator::LocatorConfig;
use crate::template::ColorMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Row location settings
    pub locator: LocatorConfig,
    /// Tesseract invocation
    pub ocr: TesseractConfig,
    /// Pixel layout used to read the screenshot and the icon templates
    pub image_mode: ColorMode,
    /// Pixel layout of the label crops handed to OCR
    pub ocr_color_mode: ColorMode,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            locator: LocatorConfig::default(),
            ocr: TesseractConfig::default(),
            image_mode: ColorMode::Color,
            ocr_color_mode: ColorMode::Gray,
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml_str(text: &str) -> ExtractResult<Self> {
        let config: ExtractorConfig = toml::from_str(text)?;
        config.locator.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> ExtractResult<Self> {
        let path = path.as_ref();
        log::info!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
