//! Row location pipeline: icon matches to one label rectangle per row

use super::config::LocatorConfig;
use super::reference::resolve_reference_points;
use super::uniformity::is_uniform;
use crate::error::{ExtractError, ExtractResult};
use crate::geometry::{Point, Rect};
use crate::template::IconTemplate;
use crate::template_matching::TemplateMatcher;
use image::DynamicImage;
use std::time::Instant;

/// Which label candidate a row ended up using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelChoice {
    Primary,
    Fallback,
}

/// One detected list row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedRow {
    pub reference: Point,
    pub choice: LabelChoice,
    /// Label rectangle in screenshot coordinates
    pub label: Rect,
}

/// Finds list rows and their label rectangles in a screenshot
#[derive(Debug, Clone)]
pub struct RowLocator {
    config: LocatorConfig,
    matcher: TemplateMatcher,
}

impl RowLocator {
    /// Create a locator; the configuration is validated here and fixed afterwards
    pub fn new(config: LocatorConfig) -> ExtractResult<Self> {
        config.validate()?;
        let matcher = TemplateMatcher::new(config.match_method, config.match_threshold);
        Ok(Self { config, matcher })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Label rectangles, one per row, top to bottom
    pub fn extract_label_regions(
        &self,
        screenshot: &DynamicImage,
        templates: &[IconTemplate],
    ) -> ExtractResult<Vec<Rect>> {
        Ok(self
            .locate_rows(screenshot, templates)?
            .into_iter()
            .map(|row| row.label)
            .collect())
    }

    /// Detect every row, keeping its reference point and label choice
    pub fn locate_rows(
        &self,
        screenshot: &DynamicImage,
        templates: &[IconTemplate],
    ) -> ExtractResult<Vec<LocatedRow>> {
        let start_time = Instant::now();

        let matches = self.match_templates(screenshot, templates)?;
        let references = resolve_reference_points(
            &matches,
            &self.config.search_rect,
            self.config.reference_x,
            self.config.max_gap,
        );

        if references.is_empty() && self.config.require_rows {
            return Err(ExtractError::NoMatchesFound);
        }

        let rows: Vec<LocatedRow> = references
            .into_iter()
            .map(|reference| self.choose_label(screenshot, reference))
            .collect();

        log::info!(
            "Located {} rows from {} icon matches in {}ms",
            rows.len(),
            matches.len(),
            start_time.elapsed().as_millis()
        );

        Ok(rows)
    }

    /// Run every template and concatenate their match rectangles in template order
    pub fn match_templates(
        &self,
        screenshot: &DynamicImage,
        templates: &[IconTemplate],
    ) -> ExtractResult<Vec<Rect>> {
        if templates.is_empty() {
            return Err(ExtractError::invalid_input(
                "templates",
                "at least one icon template is required",
            ));
        }

        let mut rects = Vec::new();
        for (i, template) in templates.iter().enumerate() {
            log::debug!(
                "🔍 Matching template {}/{}: {}",
                i + 1,
                templates.len(),
                template.name
            );
            let matches = self
                .matcher
                .find_matches(screenshot, &template.image)
                .map_err(|source| ExtractError::TemplateFailed {
                    template: template.name.clone(),
                    source: Box::new(source),
                })?;
            for m in &matches {
                log::debug!("  {}", m.describe(&template.name));
            }
            rects.extend(matches.iter().map(|m| m.rect));
        }

        Ok(rects)
    }

    /// Pick the label rectangle for the row anchored at `reference`
    pub fn choose_label(&self, screenshot: &DynamicImage, reference: Point) -> LocatedRow {
        let labels = &self.config.labels;
        let probe = labels.probe.add(reference);

        let (choice, label) =
            if is_uniform(screenshot, &probe, self.config.uniformity_tolerance) {
                (LabelChoice::Primary, labels.primary.add(reference))
            } else {
                (LabelChoice::Fallback, labels.fallback.add(reference))
            };

        log::debug!("  row at {reference}: probe {probe} -> {choice:?} label {label}");

        LocatedRow {
            reference,
            choice,
            label,
        }
    }
}
