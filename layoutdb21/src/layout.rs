//!
//! # Layout Builder Data Model
//!
//! In-memory description of a cell layout as accumulated by generator code,
//! prior to being written into a library. Coordinates are `f64` microns
//! ("user units") and layers, purposes, and via-definitions are addressed by
//! *name*; resolution to database units and numeric codes happens when the
//! layout is written ([`crate::library::LayoutLibrary::create_layout`]).
//!
//! Nothing here is validated at add-time: a [`Layout`] is an inert list of
//! geometry specifications, and may reference names its eventual target
//! library has never heard of (which are skipped, with warnings, at write time).
//!

// Std-Lib
use std::collections::HashMap;

// Crates.io
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{EndStyle, Orient};
use crate::utils::{enumstr, EnumStr};

/// # User-Unit (Micron) Coordinate Type-Alias
pub type Micron = f64;

/// # Array-Replication Specification
///
/// Replicates a figure `nx` by `ny` times at pitches `spx`, `spy`.
/// The default (1, 1) describes a single, un-arrayed figure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ArraySpec {
    pub nx: usize,
    pub ny: usize,
    pub spx: Micron,
    pub spy: Micron,
}
impl Default for ArraySpec {
    fn default() -> Self {
        Self {
            nx: 1,
            ny: 1,
            spx: 0.0,
            spy: 0.0,
        }
    }
}
impl ArraySpec {
    /// Create a new [ArraySpec]
    pub fn new(nx: usize, ny: usize, spx: Micron, spy: Micron) -> Self {
        Self { nx, ny, spx, spy }
    }
}

/// # Parameter Value Enumeration
///
/// Integer, floating-point, or string valued instance parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ParamVal {
    Int(i64),
    Float(f64),
    Str(String),
}
impl From<i64> for ParamVal {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}
impl From<f64> for ParamVal {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}
impl From<&str> for ParamVal {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}
impl From<String> for ParamVal {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// # Layout Rectangle Specification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// Layer Name
    pub layer: String,
    /// Purpose Name
    pub purpose: String,
    /// Lower-Left Corner
    pub p0: (Micron, Micron),
    /// Upper-Right Corner
    pub p1: (Micron, Micron),
    /// Array Replication
    pub array: ArraySpec,
}

/// # Layout Path-Segment Specification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathSeg {
    /// Layer Name
    pub layer: String,
    /// Purpose Name
    pub purpose: String,
    /// Start Point
    pub p0: (Micron, Micron),
    /// Stop Point
    pub p1: (Micron, Micron),
    /// Width
    pub width: Micron,
    /// Begin-End Style
    pub begin_style: EndStyle,
    /// Stop-End Style
    pub end_style: EndStyle,
}

/// # Layout Via Specification
///
/// References a via-definition by name, placing its cut array at `loc`
/// with the given row/column counts and spacings.
/// Per-layer enclosures are stored in center-margin plus offset form;
/// [Via::with_enclosure_edges] folds the per-side edge values generator
/// code typically has on hand into that form.
/// Enclosures and cut dimensions left `None` defer to the via-definition.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct Via {
    /// Via-Definition Name
    pub via_id: String,
    /// Center Location
    pub loc: (Micron, Micron),
    /// Orientation
    #[builder(default)]
    pub orient: Orient,
    /// Number of Cut Rows
    #[builder(default = "1")]
    pub rows: usize,
    /// Number of Cut Columns
    #[builder(default = "1")]
    pub cols: usize,
    /// Cut Spacing (x, y). `None` defers to the via-definition.
    #[builder(default)]
    pub spacing: Option<(Micron, Micron)>,
    /// Bottom-Layer Enclosure (x, y margins)
    #[builder(default)]
    pub enc1: Option<(Micron, Micron)>,
    /// Bottom-Layer Enclosure Offset
    #[builder(default)]
    pub off1: (Micron, Micron),
    /// Top-Layer Enclosure (x, y margins)
    #[builder(default)]
    pub enc2: Option<(Micron, Micron)>,
    /// Top-Layer Enclosure Offset
    #[builder(default)]
    pub off2: (Micron, Micron),
    /// Cut Width Override. Values at or below zero defer to the via-definition.
    #[builder(default)]
    pub cut_width: Option<Micron>,
    /// Cut Height Override. Values at or below zero defer to the via-definition.
    #[builder(default)]
    pub cut_height: Option<Micron>,
    /// Array Replication
    #[builder(default)]
    pub array: ArraySpec,
}
impl Via {
    /// Create a new single-cut [Via] of definition `via_id` centered at `loc`
    pub fn new(via_id: impl Into<String>, loc: (Micron, Micron)) -> Self {
        Self {
            via_id: via_id.into(),
            loc,
            orient: Orient::R0,
            rows: 1,
            cols: 1,
            spacing: None,
            enc1: None,
            off1: (0.0, 0.0),
            enc2: None,
            off2: (0.0, 0.0),
            cut_width: None,
            cut_height: None,
            array: ArraySpec::default(),
        }
    }
    /// Set both layer enclosures from per-side edge values `(xl, yb, xr, yt)`.
    /// Asymmetric edges fold into a symmetric margin plus a center offset:
    /// margin `((xr + xl) / 2, (yt + yb) / 2)`, offset `((xr - xl) / 2, (yt - yb) / 2)`.
    pub fn with_enclosure_edges(mut self, enc1: [Micron; 4], enc2: [Micron; 4]) -> Self {
        let fold = |e: [Micron; 4]| {
            (
                ((e[2] + e[0]) / 2.0, (e[3] + e[1]) / 2.0),
                ((e[2] - e[0]) / 2.0, (e[3] - e[1]) / 2.0),
            )
        };
        let (enc, off) = fold(enc1);
        self.enc1 = Some(enc);
        self.off1 = off;
        let (enc, off) = fold(enc2);
        self.enc2 = Some(enc);
        self.off2 = off;
        self
    }
}

/// # Layout Pin Specification
///
/// Associates a net (terminal) name, a pin name, and a text label
/// with a rectangle on a named layer-purpose pair.
/// When `make_pin` is false only the label is created,
/// and no pin figure or terminal results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pin {
    /// Net / Terminal Name
    pub net: String,
    /// Pin Name
    pub pin_name: String,
    /// Label Text
    pub label: String,
    /// Layer Name
    pub layer: String,
    /// Purpose Name
    pub purpose: String,
    /// Lower-Left Corner
    pub p0: (Micron, Micron),
    /// Upper-Right Corner
    pub p1: (Micron, Micron),
    /// Whether to create the pin figure and terminal, or the label alone
    pub make_pin: bool,
}

/// # Layout Polygon Specification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    /// Layer Name
    pub layer: String,
    /// Purpose Name
    pub purpose: String,
    /// Vertices. Closure back to the first point is implied.
    pub points: Vec<(Micron, Micron)>,
}

enumstr!(
    /// # Blockage Types
    ///
    /// The `Placement` type describes an area blockage, independent of any layer;
    /// all other types apply to the blockage's named layer.
    BlockageType {
        Placement: "placement",
        Routing: "routing",
        Via: "via",
        Pin: "pin",
        Fill: "fill",
        Wiring: "wiring",
    }
);

/// # Layout Blockage Specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Blockage {
    /// Blockage Type
    pub blockage_type: BlockageType,
    /// Layer Name. Ignored for [BlockageType::Placement].
    pub layer: Option<String>,
    /// Vertices
    pub points: Vec<(Micron, Micron)>,
}

enumstr!(
    /// # Boundary Types
    BoundaryType {
        Pr: "PR",
        Snap: "snap",
        Area: "area",
    }
);

/// # Layout Boundary Specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Boundary {
    /// Boundary Type
    pub boundary_type: BoundaryType,
    /// Vertices
    pub points: Vec<(Micron, Micron)>,
}

/// # Instance Specification
///
/// Placement of another cell, addressed by library, cell, and view name,
/// optionally arrayed into rows and columns.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct Inst {
    /// Instantiated Library Name
    pub lib_name: String,
    /// Instantiated Cell Name
    pub cell_name: String,
    /// Instantiated View Name
    pub view_name: String,
    /// Instance Name
    pub inst_name: String,
    /// Location
    pub loc: (Micron, Micron),
    /// Orientation
    #[builder(default)]
    pub orient: Orient,
    /// Number of Rows
    #[builder(default = "1")]
    pub rows: usize,
    /// Number of Columns
    #[builder(default = "1")]
    pub cols: usize,
    /// Row Pitch
    #[builder(default)]
    pub sp_rows: Micron,
    /// Column Pitch
    #[builder(default)]
    pub sp_cols: Micron,
    /// Instance Parameters
    #[builder(default)]
    pub params: HashMap<String, ParamVal>,
}

/// # Layout Builder
///
/// Accumulates the geometric and hierarchical content of one cell layout:
/// rectangles, path segments, vias, pins, polygons, blockages, boundaries,
/// and instances of other cells. All `add_` methods append; nothing is
/// resolved until the layout is written into a library.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub insts: Vec<Inst>,
    pub rects: Vec<Rect>,
    pub path_segs: Vec<PathSeg>,
    pub vias: Vec<Via>,
    pub pins: Vec<Pin>,
    pub polygons: Vec<Polygon>,
    pub blockages: Vec<Blockage>,
    pub boundaries: Vec<Boundary>,
}
impl Layout {
    /// Create a new, empty [Layout]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a rectangle on layer-purpose pair `(layer, purpose)`,
    /// spanning corners `p0` and `p1`.
    pub fn add_rect(
        &mut self,
        (layer, purpose): (&str, &str),
        p0: (Micron, Micron),
        p1: (Micron, Micron),
    ) {
        self.add_rect_array((layer, purpose), p0, p1, ArraySpec::default());
    }
    /// Add an array-replicated rectangle
    pub fn add_rect_array(
        &mut self,
        (layer, purpose): (&str, &str),
        p0: (Micron, Micron),
        p1: (Micron, Micron),
        array: ArraySpec,
    ) {
        self.rects.push(Rect {
            layer: layer.to_string(),
            purpose: purpose.to_string(),
            p0,
            p1,
            array,
        });
    }
    /// Add a path segment from `p0` to `p1`
    pub fn add_path_seg(
        &mut self,
        (layer, purpose): (&str, &str),
        p0: (Micron, Micron),
        p1: (Micron, Micron),
        width: Micron,
        begin_style: EndStyle,
        end_style: EndStyle,
    ) {
        self.path_segs.push(PathSeg {
            layer: layer.to_string(),
            purpose: purpose.to_string(),
            p0,
            p1,
            width,
            begin_style,
            end_style,
        });
    }
    /// Add a via
    pub fn add_via(&mut self, via: Via) {
        self.vias.push(via);
    }
    /// Add a pin: a net-annotated rectangle, text label, pin figure, and terminal
    pub fn add_pin(
        &mut self,
        net: &str,
        pin_name: &str,
        label: &str,
        (layer, purpose): (&str, &str),
        p0: (Micron, Micron),
        p1: (Micron, Micron),
    ) {
        self.pins.push(Pin {
            net: net.to_string(),
            pin_name: pin_name.to_string(),
            label: label.to_string(),
            layer: layer.to_string(),
            purpose: purpose.to_string(),
            p0,
            p1,
            make_pin: true,
        });
    }
    /// Add a polygon
    pub fn add_polygon(&mut self, (layer, purpose): (&str, &str), points: Vec<(Micron, Micron)>) {
        self.polygons.push(Polygon {
            layer: layer.to_string(),
            purpose: purpose.to_string(),
            points,
        });
    }
    /// Add a blockage. The layer is ignored for [BlockageType::Placement].
    pub fn add_blockage(
        &mut self,
        blockage_type: BlockageType,
        layer: Option<&str>,
        points: Vec<(Micron, Micron)>,
    ) {
        self.blockages.push(Blockage {
            blockage_type,
            layer: layer.map(str::to_string),
            points,
        });
    }
    /// Add a boundary
    pub fn add_boundary(&mut self, boundary_type: BoundaryType, points: Vec<(Micron, Micron)>) {
        self.boundaries.push(Boundary {
            boundary_type,
            points,
        });
    }
    /// Add an instance of another cell
    pub fn add_inst(&mut self, inst: Inst) {
        self.insts.push(inst);
    }
}
