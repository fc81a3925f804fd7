//!
//! # Geometry Module
//!
//! Defines the core geometric types stored in cell views,
//! including [Point], [Shape], and the eight lattice [Orient]ations,
//! and their core operations. All coordinates are database units.
//!

// Crates.io
use derive_more::{Add, AddAssign, Sub, SubAssign};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

// Local imports
use crate::utils::{enumstr, EnumStr};

/// # Database-Unit Integer Type-Alias
///
/// Used for all stored spatial coordinates.
pub type Dbu = isize;

/// # Point in two-dimensional layout-space
#[derive(
    Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Add,
    AddAssign, Sub, SubAssign,
)]
pub struct Point {
    pub x: Dbu,
    pub y: Dbu,
}
impl Point {
    /// Create a new [Point] from (x, y) coordinates
    pub fn new(x: Dbu, y: Dbu) -> Self {
        Self { x, y }
    }
    /// Create a new point shifted by `p.x` in the x-dimension and by `p.y` in the y-dimension
    pub fn shift(&self, p: &Point) -> Point {
        Point {
            x: p.x + self.x,
            y: p.y + self.y,
        }
    }
    /// Get the coordinate associated with direction `dir`
    pub fn coord(&self, dir: Dir) -> Dbu {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }
}

/// Direction Enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Dir {
    Horiz,
    Vert,
}
impl Dir {
    /// Whichever direction we are, return the other one.
    pub fn other(self) -> Self {
        match self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }
}
impl std::ops::Not for Dir {
    type Output = Self;
    /// Exclamation Operator returns the opposite direction
    fn not(self) -> Self::Output {
        self.other()
    }
}

enumstr!(
    /// # Lattice Orientations
    ///
    /// The eight orientations available to placed figures and instances:
    /// four rotations, and the same four preceded by a mirror about the x-axis.
    /// String values are the industry-conventional names.
    Orient {
        R0: "R0",
        R90: "R90",
        R180: "R180",
        R270: "R270",
        MX: "MX",
        MY: "MY",
        MXR90: "MXR90",
        MYR90: "MYR90",
    }
);
impl Default for Orient {
    /// Default orientation: unrotated, unmirrored
    fn default() -> Self {
        Self::R0
    }
}
impl Orient {
    /// Apply our orientation to [Point] `p`, about the origin.
    /// All rotations are square multiples, so arithmetic is exact.
    pub fn apply(&self, p: Point) -> Point {
        let Point { x, y } = p;
        match self {
            Orient::R0 => Point::new(x, y),
            Orient::R90 => Point::new(-y, x),
            Orient::R180 => Point::new(-x, -y),
            Orient::R270 => Point::new(y, -x),
            Orient::MX => Point::new(x, -y),
            Orient::MY => Point::new(-x, y),
            Orient::MXR90 => Point::new(y, x),
            Orient::MYR90 => Point::new(-y, -x),
        }
    }
}

enumstr!(
    /// # Path End-Styles
    ///
    /// How a path-segment terminates at each of its two ends:
    /// flush, extended by a half-width, or rounded.
    EndStyle {
        Truncate: "truncate",
        Extend: "extend",
        Round: "round",
    }
);
impl Default for EndStyle {
    fn default() -> Self {
        Self::Truncate
    }
}

/// # Rectangle
///
/// Axis-aligned rectangle, specified by two opposite corners.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}
impl Rect {
    /// Create a new [Rect] spanning points `p0` and `p1`
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
    /// Calculate our center-point
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }
    /// Our extent in the x-dimension
    pub fn width(&self) -> Dbu {
        (self.p1.x - self.p0.x).abs()
    }
    /// Our extent in the y-dimension
    pub fn height(&self) -> Dbu {
        (self.p1.y - self.p0.y).abs()
    }
}

/// # Polygon
///
/// Closed n-sided polygon with arbitrary number of vertices.
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

/// # Path
///
/// Open-ended geometric path with non-zero width and styled ends.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Path {
    pub points: Vec<Point>,
    pub width: Dbu,
    pub begin_style: EndStyle,
    pub end_style: EndStyle,
}

/// # Shape
///
/// The primary geometric primitive comprising stored layout.
/// Variants include [Rect], [Polygon], and [Path].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
    Path(Path),
}
impl Default for Shape {
    fn default() -> Self {
        Self::Rect(Rect::default())
    }
}
impl Shape {
    /// Create a new [Shape], transformed from our original location:
    /// oriented by `orient` about the origin, then shifted by `loc`.
    pub fn transformed(&self, orient: Orient, loc: Point) -> Shape {
        let mut shape = match self {
            Shape::Rect(r) => {
                // Re-normalize the corners after orientation
                let (a, b) = (orient.apply(r.p0), orient.apply(r.p1));
                Shape::Rect(Rect::new(
                    Point::new(a.x.min(b.x), a.y.min(b.y)),
                    Point::new(a.x.max(b.x), a.y.max(b.y)),
                ))
            }
            Shape::Polygon(p) => Shape::Polygon(Polygon {
                points: p.points.iter().map(|pt| orient.apply(*pt)).collect(),
            }),
            Shape::Path(p) => Shape::Path(Path {
                points: p.points.iter().map(|pt| orient.apply(*pt)).collect(),
                ..p.clone()
            }),
        };
        shape.shift(&loc);
        shape
    }
}

/// # ShapeTrait
///
/// Common shape operations, dispatched from the [Shape] enum to its variants by [enum_dispatch].
#[enum_dispatch]
pub trait ShapeTrait {
    /// Retrieve our "origin", or first [Point]
    fn point0(&self) -> &Point;
    /// Indicate whether this shape is (more or less) horizontal or vertical.
    /// Primarily used for orienting label-text.
    fn orientation(&self) -> Dir;
    /// Shift coordinates by the (x, y) values specified in `pt`
    fn shift(&mut self, pt: &Point);
    /// Boolean indication of whether the [Shape] contains [Point] `pt`.
    /// Containment is *inclusive*: points on the shape boundary are inside it.
    fn contains(&self, pt: &Point) -> bool;
}

impl ShapeTrait for Rect {
    fn point0(&self) -> &Point {
        &self.p0
    }
    fn orientation(&self) -> Dir {
        let (p0, p1) = (&self.p0, &self.p1);
        if (p1.x - p0.x).abs() < (p1.y - p0.y).abs() {
            return Dir::Vert;
        }
        Dir::Horiz
    }
    fn shift(&mut self, pt: &Point) {
        self.p0.x += pt.x;
        self.p0.y += pt.y;
        self.p1.x += pt.x;
        self.p1.y += pt.y;
    }
    fn contains(&self, pt: &Point) -> bool {
        let (p0, p1) = (&self.p0, &self.p1);
        p0.x.min(p1.x) <= pt.x
            && p0.x.max(p1.x) >= pt.x
            && p0.y.min(p1.y) <= pt.y
            && p0.y.max(p1.y) >= pt.y
    }
}
impl ShapeTrait for Polygon {
    fn point0(&self) -> &Point {
        &self.points[0]
    }
    fn orientation(&self) -> Dir {
        // Polygons are treated as horizontal for label purposes
        Dir::Horiz
    }
    fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            p.x += pt.x;
            p.y += pt.y;
        }
    }
    fn contains(&self, pt: &Point) -> bool {
        // Winding-number test, covering all realistically useful layout-polygons.
        let mut winding_num: isize = 0;
        for idx in 0..self.points.len() {
            // Accesses go one past `points.len`, closing the polygon back at its first point.
            let (past, next) = (
                &self.points[idx],
                &self.points[(idx + 1) % self.points.len()],
            );
            if past.y.min(next.y) <= pt.y && past.y.max(next.y) >= pt.y {
                // In the y-range of this segment. Check which side of it we are on.
                let side = (next.x - past.x) * (pt.y - past.y) - (pt.x - past.x) * (next.y - past.y);
                if side == 0 {
                    // On the segment itself, and containment is inclusive
                    return true;
                }
                if next.y > past.y && side > 0 {
                    winding_num += 1;
                } else if next.y < past.y && side < 0 {
                    winding_num -= 1;
                }
            }
        }
        winding_num != 0
    }
}
impl ShapeTrait for Path {
    fn point0(&self) -> &Point {
        &self.points[0]
    }
    fn orientation(&self) -> Dir {
        Dir::Horiz
    }
    fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            p.x += pt.x;
            p.y += pt.y;
        }
    }
    fn contains(&self, pt: &Point) -> bool {
        // Break into segments, and check a rectangle around each.
        // Only Manhattan segments are covered; diagonal segments report `false`.
        for k in 0..self.points.len().saturating_sub(1) {
            let (a, b) = (&self.points[k], &self.points[k + 1]);
            let rect = if a.x == b.x {
                Rect::new(
                    Point::new(a.x - self.width / 2, a.y.min(b.y)),
                    Point::new(a.x + self.width / 2, a.y.max(b.y)),
                )
            } else if a.y == b.y {
                Rect::new(
                    Point::new(a.x.min(b.x), a.y - self.width / 2),
                    Point::new(a.x.max(b.x), a.y + self.width / 2),
                )
            } else {
                continue;
            };
            if rect.contains(pt) {
                return true;
            }
        }
        false
    }
}
