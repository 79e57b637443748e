//! Flat-region test used to tell list row layouts apart

use crate::geometry::Rect;
use image::{DynamicImage, ImageBuffer, Pixel};

/// Check whether every pixel in `rect` stays within `tolerance` of the first one
///
/// The first pixel of the rectangle is the reference color. Each channel is
/// compared on its own, so a single channel drifting past `tolerance` makes
/// the region non-uniform. The rectangle is clipped to the image first; a
/// rectangle with no pixels left is uniform.
pub fn is_uniform(image: &DynamicImage, rect: &Rect, tolerance: i32) -> bool {
    let bounds = Rect::from_xywh(0, 0, image.width() as i32, image.height() as i32);
    let clipped = rect.intersect(&bounds);
    if clipped != *rect {
        log::warn!("uniformity probe {rect} clipped to image bounds as {clipped}");
    }
    if clipped.is_empty() {
        return true;
    }

    match image {
        DynamicImage::ImageLuma8(buffer) => region_is_uniform(buffer, &clipped, tolerance),
        DynamicImage::ImageRgb8(buffer) => region_is_uniform(buffer, &clipped, tolerance),
        other => {
            // Uncommon layouts: crop first so only the probe gets converted
            let crop = other.crop_imm(
                clipped.min.x as u32,
                clipped.min.y as u32,
                clipped.width() as u32,
                clipped.height() as u32,
            );
            let local = Rect::from_xywh(0, 0, clipped.width(), clipped.height());
            if other.color().channel_count() <= 2 {
                region_is_uniform(&crop.to_luma8(), &local, tolerance)
            } else {
                region_is_uniform(&crop.to_rgb8(), &local, tolerance)
            }
        }
    }
}

/// `rect` must be non-empty and inside `image`
fn region_is_uniform<P>(image: &ImageBuffer<P, Vec<u8>>, rect: &Rect, tolerance: i32) -> bool
where
    P: Pixel<Subpixel = u8>,
{
    let reference = *image.get_pixel(rect.min.x as u32, rect.min.y as u32);

    for y in rect.min.y as u32..rect.max.y as u32 {
        for x in rect.min.x as u32..rect.max.x as u32 {
            let pixel = image.get_pixel(x, y);
            let drifted = pixel
                .channels()
                .iter()
                .zip(reference.channels())
                .any(|(&value, &base)| (value as i32 - base as i32).abs() > tolerance);
            if drifted {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_constant_region_is_uniform_at_any_tolerance() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 10, Rgb([12, 200, 90])));
        let rect = Rect::from_xywh(2, 2, 10, 5);
        for tolerance in [0, 1, 5, 255] {
            assert!(is_uniform(&image, &rect, tolerance));
        }
    }

    #[test]
    fn test_single_channel_drift_breaks_uniformity() {
        let mut image = RgbImage::from_pixel(20, 10, Rgb([100, 100, 100]));
        image.put_pixel(8, 4, Rgb([100, 106, 100]));
        let image = DynamicImage::ImageRgb8(image);
        let rect = Rect::from_xywh(0, 0, 20, 10);

        assert!(!is_uniform(&image, &rect, 5));
        assert!(is_uniform(&image, &rect, 6));
        // Drifted pixel outside the probe does not matter
        assert!(is_uniform(&image, &Rect::from_xywh(0, 0, 8, 10), 0));
    }

    #[test]
    fn test_grayscale_tolerance_boundary() {
        let mut image = GrayImage::from_pixel(10, 10, Luma([50]));
        image.put_pixel(9, 9, Luma([55]));
        image.put_pixel(0, 9, Luma([45]));
        let image = DynamicImage::ImageLuma8(image);
        let rect = Rect::from_xywh(0, 0, 10, 10);

        assert!(is_uniform(&image, &rect, 5));
        assert!(!is_uniform(&image, &rect, 4));
    }

    #[test]
    fn test_reference_is_first_pixel_of_rect() {
        let mut image = GrayImage::from_pixel(10, 10, Luma([200]));
        image.put_pixel(3, 3, Luma([0]));
        let image = DynamicImage::ImageLuma8(image);

        // Starting on the dark pixel makes everything else look different
        assert!(!is_uniform(&image, &Rect::from_xywh(3, 3, 4, 4), 10));
        assert!(is_uniform(&image, &Rect::from_xywh(4, 4, 4, 4), 0));
    }

    #[test]
    fn test_degenerate_and_offscreen_rects_are_uniform() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_fn(10, 10, |x, _| {
            Luma([(x * 20) as u8])
        }));
        assert!(is_uniform(&image, &Rect::from_xywh(2, 2, 0, 5), 0));
        assert!(is_uniform(&image, &Rect::from_xywh(50, 50, 10, 10), 0));
    }

    #[test]
    fn test_partially_offscreen_rect_is_clipped() {
        let mut image = GrayImage::from_pixel(10, 10, Luma([80]));
        image.put_pixel(9, 0, Luma([0]));
        let image = DynamicImage::ImageLuma8(image);

        assert!(!is_uniform(&image, &Rect::from_xywh(5, -5, 20, 10), 3));
        assert!(is_uniform(&image, &Rect::from_xywh(-5, 2, 20, 20), 0));
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([10, 20, 30, 255]));
        image.put_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let image = DynamicImage::ImageRgba8(image);
        assert!(is_uniform(&image, &Rect::from_xywh(0, 0, 6, 6), 0));
    }
}
