//! The drawing IR produced by engines and consumed by the renderer.
//!
//! A [`Scene`] is an ordered list of [`Item`]s in logical coordinates, where
//! the unit square [0, 1]² maps onto the canvas (inside its margin). Order
//! is the only z-order: items are painted first to last, later items over
//! earlier ones.

use crate::color::Rgba;
use crate::geom::Vec2;

/// A polyline or polygon. `closed` joins the last point back to the first.
///
/// Strokes need at least one point and fills at least three to show
/// anything; shorter paths are legal and paint nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Path {
    pub fn new(points: Vec<Vec2>, closed: bool) -> Self {
        Self { points, closed }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An outline along a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub path: Path,
    /// Line width as a fraction of `min(image_width, image_height)`.
    pub width: f64,
    pub color: Rgba,
    /// Opacity the renderer paints with. `color.a` is not consulted.
    pub alpha: f64,
}

/// A filled polygon. Always filled as closed, whatever `polygon.closed` says.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub polygon: Path,
    pub color: Rgba,
    /// Opacity the renderer paints with. `color.a` is not consulted.
    pub alpha: f64,
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Stroke(Stroke),
    Fill(Fill),
}

/// An ordered list of drawing instructions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    items: Vec<Item>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in paint order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends any item on top of the current stack.
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Appends a stroke along `points`.
    pub fn add_stroke(
        &mut self,
        points: Vec<Vec2>,
        closed: bool,
        width: f64,
        color: Rgba,
        alpha: f64,
    ) {
        self.items.push(Item::Stroke(Stroke {
            path: Path::new(points, closed),
            width,
            color,
            alpha,
        }));
    }

    /// Appends a fill of the polygon through `points` (marked closed).
    pub fn add_fill(&mut self, points: Vec<Vec2>, color: Rgba, alpha: f64) {
        self.items.push(Item::Fill(Fill {
            polygon: Path::new(points, true),
            color,
            alpha,
        }));
    }

    /// Number of stroke items.
    pub fn stroke_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, Item::Stroke(_)))
            .count()
    }

    /// Number of fill items.
    pub fn fill_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, Item::Fill(_)))
            .count()
    }
}

impl FromIterator<Item> for Scene {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
