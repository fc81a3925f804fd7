//!
//! # Library Module
//!
//! [LayoutLibrary] is the scoped, on-disk resource cell views are written
//! into: opened (or created) through a lib-defs file, resolving names
//! against its technology, and closed when done.
//!
//! The resolution work - micron-to-DBU scaling, name-to-number layer and
//! purpose lookup, via expansion, array replication - happens in the
//! [LayoutWriter], one instance per written view.
//!

// Std-Lib
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Crates.io
use log::warn;
use serde::{Deserialize, Serialize};

// Local imports
use crate::bbox::BoundBox;
use crate::cell::{self, BlockageFig, BoundaryFig, CellView, Element, Instance, PinFig, TextElement};
use crate::error::{DbError, DbResult, ErrorContext};
use crate::geom::{self, Dbu, Orient, Point, Polygon, Rect, Shape, ShapeTrait};
use crate::layout::{self, ArraySpec, BlockageType, Layout, Micron};
use crate::tech::{LayerNum, PurposeNum, Tech, DRAWING, DRAWING_PURPOSE};
use crate::utils::{ErrorHelper, SerdeFile, SerializationFormat};

/// # Library Metadata
///
/// The small per-library record stored as `lib.<fmt>` in each library
/// directory: the library's name and, for libraries without their own
/// technology file, the name of the attached technology library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibMeta {
    /// Library Name
    pub name: String,
    /// Attached Technology-Library Name
    pub tech_lib: Option<String>,
}
impl SerdeFile for LibMeta {}
impl LibMeta {
    /// The metadata file-name for format `fmt`
    pub fn file_name(fmt: SerializationFormat) -> String {
        format!("lib.{}", fmt.extension())
    }
    /// Save into library directory `dir`
    pub fn save_in(&self, dir: impl AsRef<Path>, fmt: SerializationFormat) -> DbResult<()> {
        self.save(fmt, dir.as_ref().join(Self::file_name(fmt)))?;
        Ok(())
    }
    /// Open from library directory `dir`, in whichever format is present.
    /// Returns `Ok(None)` if the directory has no metadata file.
    pub fn open_in(dir: impl AsRef<Path>) -> DbResult<Option<Self>> {
        use SerializationFormat::{Json, Toml, Yaml};
        for fmt in [Yaml, Json, Toml] {
            let path = dir.as_ref().join(Self::file_name(fmt));
            if path.is_file() {
                return Ok(Some(Self::open(path, fmt)?));
            }
        }
        Ok(None)
    }
}

/// # Layout Library
///
/// An open handle on one library directory, carrying the technology data
/// and the name-resolution maps cell views are written against.
///
/// Consuming `self` in [LayoutLibrary::close] makes stale-handle misuse
/// unrepresentable: no operation can reach a closed library.
#[derive(Debug)]
pub struct LayoutLibrary {
    /// Library Name
    name: String,
    /// Library Directory
    path: PathBuf,
    /// Lib-Defs File our name was resolved (or registered) through
    defs_path: PathBuf,
    /// Technology Data
    tech: Tech,
    /// Layer-Name Resolution Map
    lay_map: HashMap<String, LayerNum>,
    /// Purpose-Name Resolution Map
    purp_map: HashMap<String, PurposeNum>,
    /// On-Disk Serialization Format
    fmt: SerializationFormat,
    /// Library Metadata
    meta: LibMeta,
}
impl LayoutLibrary {
    /// Open library `library` through lib-defs file `lib_defs`,
    /// in the default serialization format.
    ///
    /// If the library is not defined, it is created at `lib_path`:
    /// its directory is created, `tech_lib`'s technology is attached,
    /// and a `DEFINE` statement is appended to `lib_defs`.
    /// If it is defined, `lib_path` and `tech_lib` serve as fallbacks only.
    pub fn open(
        lib_defs: impl AsRef<Path>,
        library: &str,
        lib_path: impl AsRef<Path>,
        tech_lib: &str,
    ) -> DbResult<Self> {
        Self::open_with_format(
            lib_defs,
            library,
            lib_path,
            tech_lib,
            SerializationFormat::default(),
        )
    }
    /// Open library `library`, writing on-disk artifacts in format `fmt`.
    pub fn open_with_format(
        lib_defs: impl AsRef<Path>,
        library: &str,
        lib_path: impl AsRef<Path>,
        tech_lib: &str,
        fmt: SerializationFormat,
    ) -> DbResult<Self> {
        let defs_path = lib_defs.as_ref().to_path_buf();
        let parsed = libdefs21::parse_file(&defs_path)?;
        let base = defs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let table = parsed.resolve(&base)?;

        let (path, meta) = match table.get(library) {
            Some(existing) => {
                if !existing.is_dir() {
                    return Err(DbError::open(format!("Invalid library: {}", library)));
                }
                let meta = LibMeta::open_in(existing)?.unwrap_or_else(|| LibMeta {
                    name: library.to_string(),
                    tech_lib: None,
                });
                (existing.to_path_buf(), meta)
            }
            None => {
                // Create the library: directory, metadata, and lib-defs registration
                let path = lib_path.as_ref().to_path_buf();
                std::fs::create_dir_all(&path)?;
                let meta = LibMeta {
                    name: library.to_string(),
                    tech_lib: Some(tech_lib.to_string()),
                };
                meta.save_in(&path, fmt)?;
                libdefs21::append_define(&defs_path, library, &path)?;
                (path, meta)
            }
        };

        // Locate the technology: our own tech file, else the attached tech library's
        let tech = match Tech::open_in(&path)? {
            Some(tech) => tech,
            None => {
                let tech_lib_name = meta.tech_lib.as_deref().unwrap_or(tech_lib);
                let tech_dir = table.get(tech_lib_name).ok_or_else(|| {
                    DbError::open(format!("Cannot find technology library: {}", tech_lib_name))
                })?;
                Tech::open_in(tech_dir)?.ok_or_else(|| {
                    DbError::open(format!("Cannot find technology for library: {}", library))
                })?
            }
        };

        // Seed the name-resolution maps from the technology
        let mut lay_map = HashMap::new();
        for layer in tech.layers.iter() {
            lay_map.insert(layer.name.clone(), layer.num);
        }
        let mut purp_map = HashMap::new();
        for (name, num) in tech.purposes.iter() {
            purp_map.insert(name.to_string(), num);
        }

        Ok(Self {
            name: library.to_string(),
            path,
            defs_path,
            tech,
            lay_map,
            purp_map,
            fmt,
            meta,
        })
    }
    /// Register layer `name` with number `num`, extending the technology's set
    pub fn add_layer(&mut self, name: impl Into<String>, num: LayerNum) {
        self.lay_map.insert(name.into(), num);
    }
    /// Register purpose `name` with number `num`, extending the technology's set
    pub fn add_purpose(&mut self, name: impl Into<String>, num: PurposeNum) {
        self.purp_map.insert(name.into(), num);
    }
    /// Our library name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Our library directory
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Our technology data
    pub fn tech(&self) -> &Tech {
        &self.tech
    }
    /// The lib-defs file we were opened through
    pub fn defs_path(&self) -> &Path {
        &self.defs_path
    }
    /// Database units per user unit (micron)
    pub fn dbu_per_uu(&self) -> u32 {
        self.tech.dbu_per_uu
    }
    /// Resolve and write `layout` as view `(cell, view)`.
    /// Returns the resolved [CellView], as saved to disk.
    pub fn create_layout(&self, cell: &str, view: &str, layout: &Layout) -> DbResult<CellView> {
        let writer = LayoutWriter::new(self, cell, view);
        let view_data = writer.write_layout(layout)?;
        let dir = self.path.join(cell);
        std::fs::create_dir_all(&dir)?;
        view_data.save(self.fmt, cell::view_path(&self.path, cell, view, self.fmt))?;
        Ok(view_data)
    }
    /// Read back the stored view `(cell, view)`
    pub fn read_layout(&self, cell: &str, view: &str) -> DbResult<CellView> {
        let path = cell::find_view(&self.path, cell, view).ok_or_else(|| {
            DbError::open(format!(
                "No view {} for cell {} in library {}",
                view, cell, self.name
            ))
        })?;
        Ok(CellView::open_from_path(&path)?)
    }
    /// Flush library metadata and release the library
    pub fn close(self) -> DbResult<()> {
        self.meta.save_in(&self.path, self.fmt)?;
        Ok(())
    }
}

/// # Layout Writer
///
/// Single-view conversion worker: walks a [Layout]'s specifications,
/// resolves each against the owning [LayoutLibrary], and accumulates the
/// resulting [CellView]. Items referencing unknown layer, purpose, or
/// via-definition names are skipped with a logged warning; malformed
/// items (zero array counts, degenerate polygons) are errors, reported
/// with the accumulated [ErrorContext] stack.
struct LayoutWriter<'lib> {
    /// Target Library
    lib: &'lib LayoutLibrary,
    /// View Under Construction
    view: CellView,
    /// Context Stack
    ctx: Vec<ErrorContext>,
}
impl<'lib> LayoutWriter<'lib> {
    /// Create a new [LayoutWriter] targeting `(cell, view)` in `lib`
    fn new(lib: &'lib LayoutLibrary, cell: &str, view: &str) -> Self {
        Self {
            lib,
            view: CellView::new(cell, view, lib.tech.dbu_per_uu),
            ctx: Vec::new(),
        }
    }
    /// Write the whole of `layout`, consuming our in-progress view
    fn write_layout(mut self, layout: &Layout) -> DbResult<CellView> {
        self.ctx.push(ErrorContext::Library(self.lib.name.clone()));
        self.ctx.push(ErrorContext::Cell(self.view.cell_name.clone()));
        self.ctx.push(ErrorContext::View(self.view.view_name.clone()));
        for inst in &layout.insts {
            self.write_inst(inst)?;
        }
        for rect in &layout.rects {
            self.write_rect(rect)?;
        }
        for seg in &layout.path_segs {
            self.write_path_seg(seg)?;
        }
        for via in &layout.vias {
            self.write_via(via)?;
        }
        for pin in &layout.pins {
            self.write_pin(pin)?;
        }
        for poly in &layout.polygons {
            self.write_polygon(poly)?;
        }
        for blockage in &layout.blockages {
            self.write_blockage(blockage)?;
        }
        for boundary in &layout.boundaries {
            self.write_boundary(boundary)?;
        }
        self.view.touch();
        Ok(self.view)
    }
    /// Convert user-unit value `v` to database units
    fn dbu(&self, v: Micron) -> Dbu {
        (v * self.view.dbu_per_uu as f64).round() as Dbu
    }
    /// Convert user-unit coordinate-pair `xy` to a database-unit [Point]
    fn pt(&self, xy: (Micron, Micron)) -> Point {
        Point::new(self.dbu(xy.0), self.dbu(xy.1))
    }
    /// Resolve layer-name `name`, or warn and return `None`
    fn layer(&self, name: &str, what: &str) -> Option<LayerNum> {
        let num = self.lib.lay_map.get(name).copied();
        if num.is_none() {
            warn!("{}: unknown layer {}, skipping.", what, name);
        }
        num
    }
    /// Resolve purpose-name `name`, or warn and return `None`
    fn purpose(&self, name: &str, what: &str) -> Option<PurposeNum> {
        let num = self.lib.purp_map.get(name).copied();
        if num.is_none() {
            warn!("{}: unknown purpose {}, skipping.", what, name);
        }
        num
    }
    /// The purpose-number figures without an explicit purpose land on
    fn drawing_purpose(&self) -> PurposeNum {
        self.lib
            .purp_map
            .get(DRAWING.as_str())
            .copied()
            .unwrap_or(DRAWING_PURPOSE)
    }
    /// Push `shape` as an [Element], replicated per `array`.
    /// Copies land at offsets `(i * spx, j * spy)` for each
    /// `i` in `0..nx` and `j` in `0..ny`.
    fn push_arrayed(
        &mut self,
        net: Option<String>,
        layer: LayerNum,
        purpose: PurposeNum,
        shape: Shape,
        array: &ArraySpec,
    ) -> DbResult<()> {
        self.assert(array.nx > 0 && array.ny > 0, "Array counts must be nonzero")?;
        let (spx, spy) = (self.dbu(array.spx), self.dbu(array.spy));
        for i in 0..array.nx {
            for j in 0..array.ny {
                let mut copy = shape.clone();
                copy.shift(&Point::new(i as Dbu * spx, j as Dbu * spy));
                self.view.elems.push(Element {
                    net: net.clone(),
                    layer,
                    purpose,
                    shape: copy,
                });
            }
        }
        Ok(())
    }
    fn write_rect(&mut self, rect: &layout::Rect) -> DbResult<()> {
        let layer = match self.layer(&rect.layer, "rect") {
            Some(num) => num,
            None => return Ok(()),
        };
        let purpose = match self.purpose(&rect.purpose, "rect") {
            Some(num) => num,
            None => return Ok(()),
        };
        let shape = Shape::Rect(Rect::new(self.pt(rect.p0), self.pt(rect.p1)));
        self.push_arrayed(None, layer, purpose, shape, &rect.array)
    }
    fn write_path_seg(&mut self, seg: &layout::PathSeg) -> DbResult<()> {
        let layer = match self.layer(&seg.layer, "path_seg") {
            Some(num) => num,
            None => return Ok(()),
        };
        let purpose = match self.purpose(&seg.purpose, "path_seg") {
            Some(num) => num,
            None => return Ok(()),
        };
        self.assert(seg.width > 0.0, "Path width must be positive")?;
        let (p0, p1) = (self.pt(seg.p0), self.pt(seg.p1));
        // Diagonal segments measure their width perpendicular to the
        // 45-degree axis; both roundings land on even database units.
        let width = if p0.x != p1.x && p0.y != p1.y {
            self.dbu(seg.width * std::f64::consts::SQRT_2 / 2.0) * 2
        } else {
            self.dbu(seg.width / 2.0) * 2
        };
        let shape = Shape::Path(geom::Path {
            points: vec![p0, p1],
            width,
            begin_style: seg.begin_style,
            end_style: seg.end_style,
        });
        self.view.elems.push(Element {
            net: None,
            layer,
            purpose,
            shape,
        });
        Ok(())
    }
    fn write_via(&mut self, via: &layout::Via) -> DbResult<()> {
        self.ctx.push(ErrorContext::Via(via.via_id.clone()));
        let result = self.write_via_figs(via);
        self.ctx.pop();
        result
    }
    /// Expand one via specification into its cut-array and enclosure figures
    fn write_via_figs(&mut self, via: &layout::Via) -> DbResult<()> {
        let vdef = match self.lib.tech.viadefs.find(&via.via_id) {
            Some(vdef) => vdef.clone(),
            None => {
                warn!("via: unknown via-definition {}, skipping.", via.via_id);
                return Ok(());
            }
        };
        let bot = match self.layer(&vdef.bot_layer, "via") {
            Some(num) => num,
            None => return Ok(()),
        };
        let cut = match self.layer(&vdef.cut_layer, "via") {
            Some(num) => num,
            None => return Ok(()),
        };
        let top = match self.layer(&vdef.top_layer, "via") {
            Some(num) => num,
            None => return Ok(()),
        };
        self.assert(via.rows > 0 && via.cols > 0, "Via cut counts must be nonzero")?;
        let purpose = self.drawing_purpose();

        // Cut dimensions: positive overrides, else the via-definition's defaults
        let cut_w = match via.cut_width {
            Some(w) if w > 0.0 => self.dbu(w),
            _ => vdef.cut_size.0,
        };
        let cut_h = match via.cut_height {
            Some(h) if h > 0.0 => self.dbu(h),
            _ => vdef.cut_size.1,
        };
        let (spx, spy) = match via.spacing {
            Some((x, y)) => (self.dbu(x), self.dbu(y)),
            None => vdef.cut_spacing,
        };
        let (enc1x, enc1y) = match via.enc1 {
            Some((x, y)) => (self.dbu(x), self.dbu(y)),
            None => vdef.enc1,
        };
        let (enc2x, enc2y) = match via.enc2 {
            Some((x, y)) => (self.dbu(x), self.dbu(y)),
            None => vdef.enc2,
        };
        let off1 = Point::new(self.dbu(via.off1.0), self.dbu(via.off1.1));
        let off2 = Point::new(self.dbu(via.off2.0), self.dbu(via.off2.1));

        // Cut array, centered at the origin
        let (rows, cols) = (via.rows as Dbu, via.cols as Dbu);
        let total_w = cols * cut_w + (cols - 1) * spx;
        let total_h = rows * cut_h + (rows - 1) * spy;
        let (x0, y0) = (-total_w / 2, -total_h / 2);
        let mut figs: Vec<(LayerNum, Shape)> = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let ll = Point::new(x0 + c * (cut_w + spx), y0 + r * (cut_h + spy));
                figs.push((
                    cut,
                    Shape::Rect(Rect::new(ll, Point::new(ll.x + cut_w, ll.y + cut_h))),
                ));
            }
        }
        // Enclosure rectangles grow the cut-array bounds, then shift by their offsets
        let cuts_bbox = BoundBox::from_points(Point::new(x0, y0), Point::new(x0 + total_w, y0 + total_h));
        figs.push((
            bot,
            Shape::Rect(cuts_bbox.expand(enc1x, enc1y).shift(&off1).into_rect()),
        ));
        figs.push((
            top,
            Shape::Rect(cuts_bbox.expand(enc2x, enc2y).shift(&off2).into_rect()),
        ));

        // Place: orient about the origin, translate to the via location, then array
        let loc = self.pt(via.loc);
        for (layer, shape) in figs {
            let placed = shape.transformed(via.orient, loc);
            self.push_arrayed(None, layer, purpose, placed, &via.array)?;
        }
        Ok(())
    }
    fn write_pin(&mut self, pin: &layout::Pin) -> DbResult<()> {
        let layer = match self.layer(&pin.layer, "pin") {
            Some(num) => num,
            None => return Ok(()),
        };
        let purpose = match self.purpose(&pin.purpose, "pin") {
            Some(num) => num,
            None => return Ok(()),
        };
        let rect = Rect::new(self.pt(pin.p0), self.pt(pin.p1));

        // Label at the box center, rotated to R90 for taller-than-wide boxes,
        // sized to the smaller box dimension
        let (orient, height) = if rect.height() > rect.width() {
            (Orient::R90, rect.width())
        } else {
            (Orient::R0, rect.height())
        };
        self.view.labels.push(TextElement {
            string: pin.label.clone(),
            loc: rect.center(),
            orient,
            height,
            layer,
            purpose,
        });

        if pin.make_pin {
            // Pin figure, attached to its terminal.
            // Terminals are found-or-created: repeated nets accumulate pins.
            let fig = PinFig {
                name: pin.pin_name.clone(),
                layer,
                purpose,
                rect,
            };
            self.view.term_mut(&pin.net).pins.push(fig);
        }
        Ok(())
    }
    fn write_polygon(&mut self, poly: &layout::Polygon) -> DbResult<()> {
        let layer = match self.layer(&poly.layer, "polygon") {
            Some(num) => num,
            None => return Ok(()),
        };
        let purpose = match self.purpose(&poly.purpose, "polygon") {
            Some(num) => num,
            None => return Ok(()),
        };
        self.assert(
            poly.points.len() >= 3,
            "Polygons require at least three vertices",
        )?;
        let points = poly.points.iter().map(|p| self.pt(*p)).collect();
        self.view.elems.push(Element {
            net: None,
            layer,
            purpose,
            shape: Shape::Polygon(Polygon { points }),
        });
        Ok(())
    }
    fn write_blockage(&mut self, blockage: &layout::Blockage) -> DbResult<()> {
        self.assert(
            blockage.points.len() >= 3,
            "Blockages require at least three vertices",
        )?;
        let layer = match blockage.blockage_type {
            // Placement blockages are layer-independent area blockages
            BlockageType::Placement => None,
            _ => {
                let name = match &blockage.layer {
                    Some(name) => name,
                    None => {
                        warn!(
                            "blockage: missing layer for {} blockage, skipping.",
                            blockage.blockage_type
                        );
                        return Ok(());
                    }
                };
                match self.layer(name, "blockage") {
                    Some(num) => Some(num),
                    None => return Ok(()),
                }
            }
        };
        let points = blockage.points.iter().map(|p| self.pt(*p)).collect();
        self.view.blockages.push(BlockageFig {
            blockage_type: blockage.blockage_type,
            layer,
            shape: Polygon { points },
        });
        Ok(())
    }
    fn write_boundary(&mut self, boundary: &layout::Boundary) -> DbResult<()> {
        self.assert(
            boundary.points.len() >= 3,
            "Boundaries require at least three vertices",
        )?;
        let points = boundary.points.iter().map(|p| self.pt(*p)).collect();
        self.view.boundaries.push(BoundaryFig {
            boundary_type: boundary.boundary_type,
            shape: Polygon { points },
        });
        Ok(())
    }
    fn write_inst(&mut self, inst: &layout::Inst) -> DbResult<()> {
        self.ctx.push(ErrorContext::Instance(inst.inst_name.clone()));
        let result = self.assert(
            inst.rows > 0 && inst.cols > 0,
            "Instance array counts must be nonzero",
        );
        self.ctx.pop();
        result?;
        self.view.insts.push(Instance {
            lib_name: inst.lib_name.clone(),
            cell_name: inst.cell_name.clone(),
            view_name: inst.view_name.clone(),
            inst_name: inst.inst_name.clone(),
            loc: self.pt(inst.loc),
            orient: inst.orient,
            rows: inst.rows,
            cols: inst.cols,
            sp_rows: self.dbu(inst.sp_rows),
            sp_cols: self.dbu(inst.sp_cols),
            params: inst.params.clone(),
        });
        Ok(())
    }
}
impl ErrorHelper for LayoutWriter<'_> {
    type Error = DbError;
    /// Create a [DbError::Write] with our accumulated context stack
    fn err(&self, msg: impl Into<String>) -> Self::Error {
        DbError::Write {
            message: msg.into(),
            stack: self.ctx.clone(),
        }
    }
}
