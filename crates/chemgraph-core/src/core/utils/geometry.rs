use nalgebra::{Point2, Vector2};
use serde::Deserialize;
use std::cmp::Ordering;

/// An axis-aligned rectangle in drawing coordinates.
///
/// Drawing coordinates follow the editor canvas: `x` grows to the right and `y`
/// grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self {
            min: Point2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Point2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    pub fn from_center(center: Point2<f64>, width: f64, height: f64) -> Self {
        let half = Vector2::new(width.abs() / 2.0, height.abs() / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Font metrics used to size the box drawn around an atom's symbol label.
///
/// The renderer owns the real fonts; the core only needs an estimate so that
/// bounding boxes include labels and not just atom centres.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SymbolMetrics {
    /// Height of a label glyph, in drawing units.
    pub font_size: f64,
    /// Glyph width as a fraction of `font_size`.
    pub char_aspect: f64,
}

impl Default for SymbolMetrics {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            char_aspect: 0.6,
        }
    }
}

impl SymbolMetrics {
    /// Returns the box of a label with `chars` glyphs centred on `center`.
    ///
    /// A label with no glyphs collapses to a point box.
    pub fn label_box(&self, center: Point2<f64>, chars: usize) -> Rect {
        if chars == 0 {
            return Rect::from_center(center, 0.0, 0.0);
        }
        let width = self.font_size * self.char_aspect * chars as f64;
        Rect::from_center(center, width, self.font_size)
    }
}

pub fn centroid(points: &[Point2<f64>]) -> Option<Point2<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    Some(Point2::from(sum / points.len() as f64))
}

/// Z component of `(a - o) x (b - o)`.
pub fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let oa = a - o;
    let ob = b - o;
    oa.x * ob.y - oa.y * ob.x
}

/// Convex hull by Andrew's monotone chain.
///
/// Points are sorted by `x` ascending, then `y` descending, which is the
/// lexicographic order of the mirrored (y-up) plane; the turn test is mirrored to
/// match. Collinear points on the hull edges are dropped. The hull is returned
/// without repeating the first point.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted: Vec<Point2<f64>> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal))
    });
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) >= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) >= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
