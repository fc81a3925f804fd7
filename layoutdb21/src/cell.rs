//!
//! # Cell View Data Model
//!
//! The resolved, stored form of a cell layout: everything a [CellView]
//! holds is in integer database units, with layers and purposes reduced to
//! their numeric codes. Views are what actually persist inside a library
//! directory, one serialized file per `<cell>/<view>`.
//!

// Std-Lib
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Crates.io
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{Dbu, Orient, Point, Polygon, Rect, Shape};
use crate::layout::{BlockageType, BoundaryType, ParamVal};
use crate::tech::{LayerNum, PurposeNum};
use crate::utils::{SerdeFile, SerializationFormat};

/// # Primitive Geometric Element
///
/// A [Shape] stored under a numeric layer-purpose pair,
/// optionally annotated with the net it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
    /// Net Name
    pub net: Option<String>,
    /// Layer Number
    pub layer: LayerNum,
    /// Purpose Number
    pub purpose: PurposeNum,
    /// Shape
    pub shape: Shape,
}

/// # Text Element
///
/// A text label, placed at `loc` on a numeric layer-purpose pair.
/// Vertically elongated host shapes rotate their labels to `R90`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextElement {
    /// String Value
    pub string: String,
    /// Location
    pub loc: Point,
    /// Orientation
    pub orient: Orient,
    /// Text Height
    pub height: Dbu,
    /// Layer Number
    pub layer: LayerNum,
    /// Purpose Number
    pub purpose: PurposeNum,
}

/// # Placed Instance
///
/// A placement of another cell, by (library, cell, view) name.
/// Array placements keep their row/column counts and pitches un-expanded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instance {
    /// Instantiated Library Name
    pub lib_name: String,
    /// Instantiated Cell Name
    pub cell_name: String,
    /// Instantiated View Name
    pub view_name: String,
    /// Instance Name
    pub inst_name: String,
    /// Location
    pub loc: Point,
    /// Orientation
    pub orient: Orient,
    /// Number of Rows
    pub rows: usize,
    /// Number of Columns
    pub cols: usize,
    /// Row Pitch
    pub sp_rows: Dbu,
    /// Column Pitch
    pub sp_cols: Dbu,
    /// Instance Parameters
    pub params: HashMap<String, ParamVal>,
}

/// # Pin Figure
///
/// One physical rectangle of a [Terminal], on a numeric layer-purpose pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinFig {
    /// Pin Name
    pub name: String,
    /// Layer Number
    pub layer: LayerNum,
    /// Purpose Number
    pub purpose: PurposeNum,
    /// Pin Rectangle
    pub rect: Rect,
}

/// # Terminal
///
/// A named connection point of the cell, owning one or more [PinFig]s.
/// Terminal names are unique within a view; re-used names accumulate
/// additional pin figures onto the existing terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Terminal {
    /// Terminal / Net Name
    pub name: String,
    /// Pin Figures
    pub pins: Vec<PinFig>,
}

/// # Stored Blockage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockageFig {
    /// Blockage Type
    pub blockage_type: BlockageType,
    /// Layer Number. `None` for area (placement) blockages.
    pub layer: Option<LayerNum>,
    /// Blocked Region
    pub shape: Polygon,
}

/// # Stored Boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundaryFig {
    /// Boundary Type
    pub boundary_type: BoundaryType,
    /// Boundary Region
    pub shape: Polygon,
}

/// # Cell View
///
/// The stored content of one `<cell>/<view>` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellView {
    /// Cell Name
    pub cell_name: String,
    /// View Name
    pub view_name: String,
    /// Database Units per User Unit, at write time
    pub dbu_per_uu: u32,
    /// Creation Time
    pub created: NaiveDateTime,
    /// Last-Modification Time
    pub modified: NaiveDateTime,
    /// Cell Instances
    pub insts: Vec<Instance>,
    /// Primitive Elements
    pub elems: Vec<Element>,
    /// Text Labels
    pub labels: Vec<TextElement>,
    /// Terminals
    pub terms: Vec<Terminal>,
    /// Blockages
    pub blockages: Vec<BlockageFig>,
    /// Boundaries
    pub boundaries: Vec<BoundaryFig>,
}
impl SerdeFile for CellView {}
impl CellView {
    /// Create a new, empty [CellView]
    pub fn new(cell_name: impl Into<String>, view_name: impl Into<String>, dbu_per_uu: u32) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            cell_name: cell_name.into(),
            view_name: view_name.into(),
            dbu_per_uu,
            created: now,
            modified: now,
            insts: Vec::new(),
            elems: Vec::new(),
            labels: Vec::new(),
            terms: Vec::new(),
            blockages: Vec::new(),
            boundaries: Vec::new(),
        }
    }
    /// Get a mutable reference to the [Terminal] named `name`,
    /// creating it if it does not yet exist.
    pub fn term_mut(&mut self, name: &str) -> &mut Terminal {
        match self.terms.iter().position(|t| t.name == name) {
            Some(idx) => &mut self.terms[idx],
            None => {
                self.terms.push(Terminal {
                    name: name.to_string(),
                    pins: Vec::new(),
                });
                let idx = self.terms.len() - 1;
                &mut self.terms[idx]
            }
        }
    }
    /// Stamp our modification time to now
    pub fn touch(&mut self) {
        self.modified = chrono::Utc::now().naive_utc();
    }
}

/// Path of the view file for `(cell, view)` in format `fmt`, inside library directory `lib_dir`
pub fn view_path(
    lib_dir: impl AsRef<Path>,
    cell: &str,
    view: &str,
    fmt: SerializationFormat,
) -> PathBuf {
    lib_dir
        .as_ref()
        .join(cell)
        .join(format!("{}.{}", view, fmt.extension()))
}
/// Locate an existing view file for `(cell, view)` in any supported format.
pub fn find_view(lib_dir: impl AsRef<Path>, cell: &str, view: &str) -> Option<PathBuf> {
    use SerializationFormat::{Json, Toml, Yaml};
    for fmt in [Yaml, Json, Toml] {
        let path = view_path(&lib_dir, cell, view, fmt);
        if path.is_file() {
            return Some(path);
        }
    }
    None
}
