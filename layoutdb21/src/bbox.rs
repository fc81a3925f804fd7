//!
//! # Rectangular Bounding Boxes and Associated Trait
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{Dbu, Path, Point, Polygon, Rect, Shape};

/// # Rectangular Bounding Box
///
/// Points `p0` and `p1` represent opposite corners of a bounding rectangle.
/// `p0` is always closest to negative-infinity, in both x and y,
/// and `p1` is always closest to positive-infinity.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Create a new [BoundBox] from two [Point]s, in any corner-order.
    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }
    /// Create a new [BoundBox] from a single [Point].
    /// The resultant [BoundBox] comprises solely the point, having zero area.
    pub fn from_point(pt: Point) -> Self {
        Self { p0: pt, p1: pt }
    }
    /// Create an empty, otherwise invalid [BoundBox]
    pub fn empty() -> Self {
        Self {
            p0: Point::new(Dbu::MAX, Dbu::MAX),
            p1: Point::new(Dbu::MIN, Dbu::MIN),
        }
    }
    /// Boolean indication of whether a box is empty
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }
    /// Boolean indication of whether [Point] `pt` lies inside our box.
    pub fn contains(&self, pt: &Point) -> bool {
        self.p0.x <= pt.x && self.p1.x >= pt.x && self.p0.y <= pt.y && self.p1.y >= pt.y
    }
    /// Expand in-place by [Point] `pt`, such that the result includes it
    pub fn update(&mut self, pt: &Point) {
        self.p0.x = self.p0.x.min(pt.x);
        self.p0.y = self.p0.y.min(pt.y);
        self.p1.x = self.p1.x.max(pt.x);
        self.p1.y = self.p1.y.max(pt.y);
    }
    /// Create a new [BoundBox] that also includes all of `other`
    pub fn union(&self, other: &BoundBox) -> BoundBox {
        BoundBox {
            p0: Point::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
            p1: Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
        }
    }
    /// Create a new [BoundBox] grown by `dx` on each x-side and `dy` on each y-side.
    /// Negative values shrink the box.
    pub fn expand(&self, dx: Dbu, dy: Dbu) -> BoundBox {
        BoundBox {
            p0: Point::new(self.p0.x - dx, self.p0.y - dy),
            p1: Point::new(self.p1.x + dx, self.p1.y + dy),
        }
    }
    /// Create a new [BoundBox] shifted by `pt`
    pub fn shift(&self, pt: &Point) -> BoundBox {
        BoundBox {
            p0: self.p0.shift(pt),
            p1: self.p1.shift(pt),
        }
    }
    /// Our center-point
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }
    /// Our extent in the x-dimension
    pub fn width(&self) -> Dbu {
        self.p1.x - self.p0.x
    }
    /// Our extent in the y-dimension
    pub fn height(&self) -> Dbu {
        self.p1.y - self.p0.y
    }
    /// Convert to a corner-specified [Rect]
    pub fn into_rect(self) -> Rect {
        Rect::new(self.p0, self.p1)
    }
}

/// # Bounding-Box Trait
/// Retrieval of rectangular bounds for geometric types
pub trait BoundBoxTrait {
    fn bbox(&self) -> BoundBox;
}
impl BoundBoxTrait for Point {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_point(*self)
    }
}
impl BoundBoxTrait for [Point] {
    fn bbox(&self) -> BoundBox {
        let mut bx = BoundBox::empty();
        for pt in self.iter() {
            bx.update(pt);
        }
        bx
    }
}
impl BoundBoxTrait for Rect {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_points(self.p0, self.p1)
    }
}
impl BoundBoxTrait for Polygon {
    fn bbox(&self) -> BoundBox {
        self.points.bbox()
    }
}
impl BoundBoxTrait for Path {
    /// Note path bounds include the width of each segment,
    /// but not any end-style extensions.
    fn bbox(&self) -> BoundBox {
        let centers = self.points.bbox();
        if centers.is_empty() {
            return centers;
        }
        centers.expand(self.width / 2, self.width / 2)
    }
}
impl BoundBoxTrait for Shape {
    fn bbox(&self) -> BoundBox {
        match self {
            Shape::Rect(r) => r.bbox(),
            Shape::Polygon(p) => p.bbox(),
            Shape::Path(p) => p.bbox(),
        }
    }
}
