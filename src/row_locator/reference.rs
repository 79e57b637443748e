//! Reference points: one canonical anchor per detected list row

use super::cluster::group_averages;
use crate::geometry::{Point, Rect};

/// Collapse icon match rectangles into one reference point per row
///
/// Only match origins inside `search_rect` (inclusive bounds) are trusted.
/// Their Y coordinates are sorted, grouped with `max_gap`, averaged and
/// truncated toward zero; every row is anchored at `reference_x`.
/// Points come back in ascending Y order.
pub fn resolve_reference_points(
    matches: &[Rect],
    search_rect: &Rect,
    reference_x: i32,
    max_gap: i32,
) -> Vec<Point> {
    let mut ys: Vec<i32> = matches
        .iter()
        .map(|rect| rect.min)
        .filter(|origin| {
            let inside = search_rect.contains_inclusive(*origin);
            if !inside {
                log::debug!("  discarding match origin {origin} outside {search_rect}");
            }
            inside
        })
        .map(|origin| origin.y)
        .collect();

    // Matches arrive grouped per template, not by row
    ys.sort_unstable();

    group_averages(&ys, max_gap)
        .into_iter()
        .map(|average| Point::new(reference_x, average as i32))
        .collect()
}
