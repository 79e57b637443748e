//! Loading screenshots and icon templates from disk

use crate::error::{ExtractError, ExtractResult};
use crate::geometry::Rect;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How pixel data is read before matching or OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Single 8-bit luminance channel
    Gray,
    /// Three 8-bit color channels, alpha dropped
    #[default]
    Color,
}

impl ColorMode {
    /// Convert an image to this mode's pixel layout
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match (self, image) {
            (ColorMode::Gray, image @ DynamicImage::ImageLuma8(_)) => image,
            (ColorMode::Color, image @ DynamicImage::ImageRgb8(_)) => image,
            (ColorMode::Gray, image) => DynamicImage::ImageLuma8(image.to_luma8()),
            (ColorMode::Color, image) => DynamicImage::ImageRgb8(image.to_rgb8()),
        }
    }
}

/// Decode an image file and convert it to `mode`
pub fn load_image(path: impl AsRef<Path>, mode: ColorMode) -> ExtractResult<DynamicImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| ExtractError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ExtractError::EmptyImage {
            context: format!("{} decoded to a zero-size image", path.display()),
        });
    }
    Ok(mode.apply(image))
}

/// A small icon crop searched for in screenshots
#[derive(Debug, Clone)]
pub struct IconTemplate {
    pub name: String,
    pub image: DynamicImage,
}

impl IconTemplate {
    pub fn new(name: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Load a template file, named after its file stem
    ///
    /// A file named like `follow-[600,480,90,40].png` holds a full screenshot;
    /// only the bracketed `[x,y,width,height]` region is kept as the template.
    pub fn open(path: impl AsRef<Path>, mode: ColorMode) -> ExtractResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let image = load_image(path, mode)?;
        let image = match Rect::parse_bracketed(&name) {
            Some(region) => crop_region(image, &region, &name)?,
            None => image,
        };

        log::debug!(
            "Loaded template '{}' ({}x{})",
            name,
            image.width(),
            image.height()
        );

        Ok(Self { name, image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

fn crop_region(image: DynamicImage, region: &Rect, name: &str) -> ExtractResult<DynamicImage> {
    let bounds = Rect::from_xywh(0, 0, image.width() as i32, image.height() as i32);
    if region.is_empty() || region.intersect(&bounds) != *region {
        return Err(ExtractError::invalid_input(
            name,
            format!(
                "template crop region {} exceeds image bounds ({}x{})",
                region,
                image.width(),
                image.height()
            ),
        ));
    }
    Ok(image.crop_imm(
        region.min.x as u32,
        region.min.y as u32,
        region.width() as u32,
        region.height() as u32,
    ))
}
