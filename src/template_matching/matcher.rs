/// Template matching implementation
///
/// Multi-instance matching: score every placement once, then repeatedly take
/// the global maximum and suppress every placement overlapping it.
use super::types::{Match, MatchMethod};
use crate::error::{ExtractError, ExtractResult};
use crate::geometry::Rect;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::{MatchTemplateMethod, find_extremes, match_template};

type ScoreMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Template matcher with a fixed method and acceptance threshold
#[derive(Debug, Clone, Copy)]
pub struct TemplateMatcher {
    method: MatchMethod,
    threshold: f32,
}

impl TemplateMatcher {
    /// Create a matcher; `threshold` is inclusive and in the method's native range.
    pub fn new(method: MatchMethod, threshold: f32) -> Self {
        Self { method, threshold }
    }

    pub fn method(&self) -> MatchMethod {
        self.method
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Find every non-overlapping placement of `template` in `image`
    ///
    /// # Arguments
    /// * `image` - The screenshot to search (grayscale or color)
    /// * `template` - The icon to find, with the same channel count as `image`
    ///
    /// # Returns
    /// Matches ordered best first. An empty vec means nothing reached the threshold.
    pub fn find_matches(
        &self,
        image: &DynamicImage,
        template: &DynamicImage,
    ) -> ExtractResult<Vec<Match>> {
        if !self.threshold.is_finite() {
            return Err(ExtractError::invalid_input(
                "threshold",
                format!("{} is not a finite score", self.threshold),
            ));
        }
        let image_planes = channel_planes(image, "search image")?;
        let template_planes = channel_planes(template, "template")?;

        if image_planes.len() != template_planes.len() {
            return Err(ExtractError::invalid_input(
                "template",
                format!(
                    "channel count {} does not match search image channel count {}",
                    template_planes.len(),
                    image_planes.len()
                ),
            ));
        }

        let (image_width, image_height) = image_planes[0].dimensions();
        let (template_width, template_height) = template_planes[0].dimensions();
        if template_width > image_width || template_height > image_height {
            return Err(ExtractError::invalid_input(
                "template",
                format!(
                    "template {}x{} is larger than search image {}x{}",
                    template_width, template_height, image_width, image_height
                ),
            ));
        }

        let mut scores = self.score_map(&image_planes, &template_planes);
        let min_score = self.method.normalized_threshold(self.threshold);
        let mut matches = Vec::new();

        loop {
            let extremes = find_extremes(&scores);
            let best = extremes.max_value;
            // Negated comparison so suppressed (-inf) cells always stop the loop
            if !(best >= min_score) {
                break;
            }

            let (x, y) = extremes.max_value_location;
            let rect = Rect::from_xywh(
                x as i32,
                y as i32,
                template_width as i32,
                template_height as i32,
            );
            let accepted = Match {
                rect,
                score: self.method.native_score(best),
            };
            log::debug!(
                "  match #{} at {} score={:.4}",
                matches.len() + 1,
                rect,
                accepted.score
            );
            matches.push(accepted);

            suppress_overlapping(&mut scores, x, y, template_width, template_height);
        }

        log::debug!(
            "{:?} found {} matches at threshold {}",
            self.method,
            matches.len(),
            self.threshold
        );

        Ok(matches)
    }

    /// Channel-averaged score map, normalized so higher is better
    fn score_map(&self, image_planes: &[GrayImage], template_planes: &[GrayImage]) -> ScoreMap {
        let mut pairs = image_planes.iter().zip(template_planes);
        let mut scores = match pairs.next() {
            Some((image_plane, template_plane)) => self.plane_scores(image_plane, template_plane),
            None => return ScoreMap::new(0, 0),
        };
        for (image_plane, template_plane) in pairs {
            let plane_scores = self.plane_scores(image_plane, template_plane);
            for (acc, value) in scores.pixels_mut().zip(plane_scores.pixels()) {
                acc[0] += value[0];
            }
        }

        let planes = image_planes.len() as f32;
        let negate = self.method.is_error_measure();
        for pixel in scores.pixels_mut() {
            let mut value = pixel[0] / planes;
            if negate {
                value = -value;
            }
            pixel[0] = if value.is_finite() { value } else { f32::NEG_INFINITY };
        }
        scores
    }

    fn plane_scores(&self, image: &GrayImage, template: &GrayImage) -> ScoreMap {
        let native = match self.method {
            MatchMethod::SumOfSquaredErrors => MatchTemplateMethod::SumOfSquaredErrors,
            MatchMethod::SumOfSquaredErrorsNormalized => {
                MatchTemplateMethod::SumOfSquaredErrorsNormalized
            }
            MatchMethod::CrossCorrelation => MatchTemplateMethod::CrossCorrelation,
            MatchMethod::CrossCorrelationNormalized => {
                MatchTemplateMethod::CrossCorrelationNormalized
            }
            MatchMethod::CorrelationCoefficientNormalized => {
                return correlation_coefficient_normalized(image, template);
            }
        };
        match_template(image, template, native)
    }
}

/// Split an image into 8-bit channel planes: one for gray, three for color
fn channel_planes(image: &DynamicImage, context: &str) -> ExtractResult<Vec<GrayImage>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExtractError::EmptyImage {
            context: format!("{context} has zero size"),
        });
    }

    if image.color().channel_count() <= 2 {
        return Ok(vec![image.to_luma8()]);
    }

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((0..3)
        .map(|channel| {
            GrayImage::from_fn(width, height, |x, y| Luma([rgb.get_pixel(x, y)[channel]]))
        })
        .collect())
}

/// Remove every placement whose rectangle would overlap the accepted one
fn suppress_overlapping(scores: &mut ScoreMap, x: u32, y: u32, width: u32, height: u32) {
    let x_start = x.saturating_sub(width - 1);
    let y_start = y.saturating_sub(height - 1);
    let x_end = (x + width).min(scores.width());
    let y_end = (y + height).min(scores.height());
    for sy in y_start..y_end {
        for sx in x_start..x_end {
            scores.put_pixel(sx, sy, Luma([f32::NEG_INFINITY]));
        }
    }
}

/// Zero-mean normalized cross correlation
///
/// Built from the raw cross correlation and summed-area tables of the image;
/// windows or templates with zero variance score 0.
fn correlation_coefficient_normalized(image: &GrayImage, template: &GrayImage) -> ScoreMap {
    let cross = match_template(image, template, MatchTemplateMethod::CrossCorrelation);
    let (template_width, template_height) = template.dimensions();
    let count = (template_width * template_height) as f64;

    let (template_sum, template_sq_sum) = template.pixels().fold((0.0, 0.0), |(s, sq), p| {
        let v = p[0] as f64;
        (s + v, sq + v * v)
    });
    let template_var = template_sq_sum - template_sum * template_sum / count;
    let template_mean = template_sum / count;

    let table = SummedArea::new(image);
    ImageBuffer::from_fn(cross.width(), cross.height(), |x, y| {
        let (sum, sq_sum) = table.window(x, y, template_width, template_height);
        let window_var = (sq_sum - sum * sum / count).max(0.0);
        let denominator = (window_var * template_var).sqrt();
        if denominator <= f64::EPSILON {
            return Luma([0.0]);
        }
        let numerator = cross.get_pixel(x, y)[0] as f64 - template_mean * sum;
        Luma([(numerator / denominator).clamp(-1.0, 1.0) as f32])
    })
}

/// Summed-area tables of pixel values and squared pixel values
struct SummedArea {
    stride: usize,
    sums: Vec<u64>,
    sq_sums: Vec<u64>,
}

impl SummedArea {
    fn new(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let stride = width as usize + 1;
        let len = stride * (height as usize + 1);
        let mut sums = vec![0u64; len];
        let mut sq_sums = vec![0u64; len];

        for y in 0..height as usize {
            let mut row_sum = 0u64;
            let mut row_sq_sum = 0u64;
            for x in 0..width as usize {
                let v = image.get_pixel(x as u32, y as u32)[0] as u64;
                row_sum += v;
                row_sq_sum += v * v;
                let idx = (y + 1) * stride + x + 1;
                sums[idx] = sums[idx - stride] + row_sum;
                sq_sums[idx] = sq_sums[idx - stride] + row_sq_sum;
            }
        }

        Self {
            stride,
            sums,
            sq_sums,
        }
    }

    /// Sum and squared sum of the window with top-left (x, y)
    fn window(&self, x: u32, y: u32, width: u32, height: u32) -> (f64, f64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + width as usize, y0 + height as usize);
        let area = |table: &[u64]| {
            let total = table[y1 * self.stride + x1] + table[y0 * self.stride + x0];
            let cut = table[y0 * self.stride + x1] + table[y1 * self.stride + x0];
            (total - cut) as f64
        };
        (area(&self.sums), area(&self.sq_sums))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const ICON: u32 = 8;

    fn icon_value(x: u32, y: u32) -> u8 {
        if (x * 7 + y * 13 + x * y) % 5 < 2 { 20 } else { 230 }
    }

    fn icon() -> GrayImage {
        GrayImage::from_fn(ICON, ICON, |x, y| Luma([icon_value(x, y)]))
    }

    /// White canvas with the icon stamped at each position
    fn canvas(width: u32, height: u32, positions: &[(u32, u32)]) -> GrayImage {
        let mut image = GrayImage::from_pixel(width, height, Luma([255]));
        for &(px, py) in positions {
            for y in 0..ICON {
                for x in 0..ICON {
                    image.put_pixel(px + x, py + y, Luma([icon_value(x, y)]));
                }
            }
        }
        image
    }

    fn gray(image: GrayImage) -> DynamicImage {
        DynamicImage::ImageLuma8(image)
    }

    #[test]
    fn test_finds_every_instance_best_first() {
        let mut image = canvas(80, 40, &[(5, 5), (30, 5), (55, 20)]);
        // Degrade the third instance so it scores lower
        image.put_pixel(57, 22, Luma([128]));
        image.put_pixel(60, 25, Luma([128]));

        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, 0.8);
        let matches = matcher.find_matches(&gray(image), &gray(icon())).unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[2].rect, Rect::from_xywh(55, 20, 8, 8));
        assert!(matches[0].score > 0.99);
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score, "scores must not increase");
        }
        let mut origins: Vec<_> = matches[..2].iter().map(|m| m.rect.min).collect();
        origins.sort_by_key(|p| p.x);
        assert_eq!(origins[0].x, 5);
        assert_eq!(origins[1].x, 30);
    }

    #[test]
    fn test_matches_never_overlap() {
        // Tightly packed copies, adjacent placements share pixels with each other
        let image = canvas(40, 20, &[(0, 0), (8, 0), (16, 0), (24, 0), (4, 10)]);
        let matcher = TemplateMatcher::new(MatchMethod::CrossCorrelationNormalized, 0.5);
        let matches = matcher.find_matches(&gray(image), &gray(icon())).unwrap();

        assert!(!matches.is_empty());
        for (i, a) in matches.iter().enumerate() {
            for b in &matches[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.rect, b.rect);
            }
        }
    }

    #[test]
    fn test_raising_threshold_never_adds_matches() {
        let mut image = canvas(80, 40, &[(5, 5), (30, 5), (55, 20)]);
        image.put_pixel(31, 6, Luma([140]));
        let template = gray(icon());
        let image = gray(image);

        let mut previous = usize::MAX;
        for threshold in [0.0, 0.3, 0.6, 0.9, 0.99, 1.0] {
            let matcher =
                TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, threshold);
            let count = matcher.find_matches(&image, &template).unwrap().len();
            assert!(count <= previous, "threshold {threshold} returned more matches");
            previous = count;
        }
    }

    #[test]
    fn test_error_threshold_is_inclusive() {
        let image = gray(canvas(40, 20, &[(3, 4), (25, 9)]));
        let matcher = TemplateMatcher::new(MatchMethod::SumOfSquaredErrors, 0.0);
        let matches = matcher.find_matches(&image, &gray(icon())).unwrap();

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.score == 0.0));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let image = gray(GrayImage::from_pixel(30, 30, Luma([255])));
        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, 0.8);
        let matches = matcher.find_matches(&image, &gray(icon())).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_template_larger_than_image_is_invalid() {
        let image = gray(GrayImage::from_pixel(4, 4, Luma([0])));
        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, 0.8);
        let result = matcher.find_matches(&image, &gray(icon()));
        assert!(matches!(result, Err(ExtractError::InvalidInput { .. })));
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, 0.8);
        let empty = gray(GrayImage::new(0, 0));
        let result = matcher.find_matches(&gray(canvas(20, 20, &[])), &empty);
        assert!(matches!(result, Err(ExtractError::EmptyImage { .. })));
    }

    #[test]
    fn test_channel_mismatch_is_invalid() {
        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, 0.8);
        let color_template = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let result = matcher.find_matches(&gray(canvas(20, 20, &[])), &color_template);
        assert!(matches!(result, Err(ExtractError::InvalidInput { .. })));
    }

    #[test]
    fn test_color_image_matches_per_channel() {
        let mut image = RgbImage::from_pixel(40, 30, Rgb([250, 250, 250]));
        let template = RgbImage::from_fn(ICON, ICON, |x, y| {
            let v = icon_value(x, y);
            Rgb([v, 255 - v, v / 2])
        });
        for y in 0..ICON {
            for x in 0..ICON {
                image.put_pixel(20 + x, 11 + y, *template.get_pixel(x, y));
            }
        }

        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized, 0.9);
        let matches = matcher
            .find_matches(
                &DynamicImage::ImageRgb8(image),
                &DynamicImage::ImageRgb8(template),
            )
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rect, Rect::from_xywh(20, 11, 8, 8));
    }

    #[test]
    fn test_summed_area_window() {
        let image = GrayImage::from_fn(5, 4, |x, y| Luma([(x + y * 5) as u8]));
        let table = SummedArea::new(&image);
        let (sum, sq_sum) = table.window(1, 1, 2, 2);
        // pixels 6, 7, 11, 12
        assert_eq!(sum, 36.0);
        assert_eq!(sq_sum, 36.0 + 49.0 + 121.0 + 144.0);
    }
}
