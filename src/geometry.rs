//! Integer points and half-open rectangles in screenshot pixel space

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Axis-aligned rectangle; `min` is inclusive and `max` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Build a rectangle from two corners, swapping coordinates if needed.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Zero-area rectangles contain no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Translate by `offset`.
    pub fn add(&self, offset: Point) -> Rect {
        Rect {
            min: self.min.add(offset),
            max: self.max.add(offset),
        }
    }

    /// Make this rectangle relative to `anchor`.
    pub fn sub(&self, anchor: Point) -> Rect {
        Rect {
            min: self.min.sub(anchor),
            max: self.max.sub(anchor),
        }
    }

    /// Point containment with all four bounds inclusive.
    pub fn contains_inclusive(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Largest rectangle inside both; may be empty.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let min = Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
        if min.x >= max.x || min.y >= max.y {
            return Rect { min, max: min };
        }
        Rect { min, max }
    }

    /// Parse the bracketed `[x,y,width,height]` notation.
    ///
    /// The brackets may be embedded in a longer string such as a file name
    /// (`follow-[600,308,75,1382].png`).
    pub fn parse_bracketed(text: &str) -> Option<Rect> {
        let start = text.find('[')?;
        let end = text[start..].find(']')? + start;
        let parts: Vec<&str> = text[start + 1..end].split(',').collect();
        if parts.len() != 4 {
            return None;
        }
        let mut values = [0i32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.trim().parse().ok()?;
        }
        let [x, y, width, height] = values;
        if width < 0 || height < 0 {
            return None;
        }
        Some(Rect::new(x, y, x.checked_add(width)?, y.checked_add(height)?))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.min.x,
            self.min.y,
            self.width(),
            self.height()
        )
    }
}
