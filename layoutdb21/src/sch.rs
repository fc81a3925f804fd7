//!
//! # Schematic Module
//!
//! Copies schematic and symbol cell views between libraries, renaming the
//! cells along the way. Unlike [crate::library::LayoutLibrary], the
//! [SchematicWriter] never creates its destination library: writing
//! schematics into a library nobody has defined is an error.
//!

// Std-Lib
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Crates.io
use log::warn;
use serde::{Deserialize, Serialize};

// Local imports
use crate::cell::{find_view, view_path};
use crate::error::{DbError, DbResult};
use crate::layout::ParamVal;
use crate::utils::{SerdeFile, SerializationFormat};
use libdefs21::LibDefsTable;

/// The property naming a symbol's part; updated when its cell is renamed
pub const PART_NAME_PROP: &str = "partName";

/// # Schematic Instance
///
/// One placed sub-cell of a schematic view, with its parameter values
/// and terminal connections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchInstance {
    /// Instance Name
    pub inst_name: String,
    /// Instantiated Library Name
    pub lib_name: String,
    /// Instantiated Cell Name
    pub cell_name: String,
    /// Parameter Values
    pub params: HashMap<String, ParamVal>,
    /// Terminal Connections, instance-terminal to net
    pub conns: HashMap<String, String>,
}

/// # Schematic Cell View
///
/// The stored content of a schematic or symbol view:
/// its pin list, instances, and properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchCellView {
    /// Cell Name
    pub cell_name: String,
    /// Pin Names
    pub pins: Vec<String>,
    /// Instances
    pub insts: Vec<SchInstance>,
    /// Properties
    pub props: HashMap<String, ParamVal>,
}
impl SerdeFile for SchCellView {}

/// # Schematic Copy Job
///
/// Names a source `(lib, cell)` and the cell name it lands under
/// in the destination library.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchCell {
    /// Source Library Name
    pub lib_name: String,
    /// Source Cell Name
    pub cell_name: String,
    /// Destination Cell Name
    pub new_cell_name: String,
}
impl SchCell {
    /// Create a new [SchCell] copy job
    pub fn new(
        lib_name: impl Into<String>,
        cell_name: impl Into<String>,
        new_cell_name: impl Into<String>,
    ) -> Self {
        Self {
            lib_name: lib_name.into(),
            cell_name: cell_name.into(),
            new_cell_name: new_cell_name.into(),
        }
    }
}

/// # Schematic Writer
///
/// An open handle on a destination library for schematic copies,
/// retaining the resolved lib-defs table so source libraries can be
/// located by name.
#[derive(Debug)]
pub struct SchematicWriter {
    /// Destination Library Name
    name: String,
    /// Destination Library Directory
    path: PathBuf,
    /// Resolved Library Definitions
    table: LibDefsTable,
    /// On-Disk Serialization Format
    fmt: SerializationFormat,
}
impl SchematicWriter {
    /// Open destination library `library` through lib-defs file `lib_defs`.
    /// Find-only: an undefined `library` is an error.
    pub fn open(lib_defs: impl AsRef<Path>, library: &str) -> DbResult<Self> {
        Self::open_with_format(lib_defs, library, SerializationFormat::default())
    }
    /// Open destination library `library`, writing in format `fmt`
    pub fn open_with_format(
        lib_defs: impl AsRef<Path>,
        library: &str,
        fmt: SerializationFormat,
    ) -> DbResult<Self> {
        let defs_path = lib_defs.as_ref();
        let parsed = libdefs21::parse_file(defs_path)?;
        let base = defs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let table = parsed.resolve(&base)?;
        let path = table
            .get(library)
            .ok_or_else(|| DbError::open(format!("Cannot find library: {}", library)))?
            .to_path_buf();
        if !path.is_dir() {
            return Err(DbError::open(format!("Invalid library: {}", library)));
        }
        Ok(Self {
            name: library.to_string(),
            path,
            table,
            fmt,
        })
    }
    /// Our destination library name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Our destination library directory
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Copy each of `cells` into our destination library:
    /// the `sch_view` schematic as-is (renamed), and the `sym_view` symbol
    /// with its part-name property updated to the new cell name.
    pub fn create_schematics(
        &self,
        cells: &[SchCell],
        sch_view: &str,
        sym_view: &str,
    ) -> DbResult<()> {
        for cell in cells {
            let src_dir = self.table.get(&cell.lib_name).ok_or_else(|| {
                DbError::open(format!("Cannot find library: {}", cell.lib_name))
            })?;

            // Copy the schematic view, renamed
            let mut sch = self.load_view(src_dir, &cell.cell_name, sch_view)?;
            sch.cell_name = cell.new_cell_name.clone();
            self.save_view(&sch, &cell.new_cell_name, sch_view)?;

            // Copy the symbol view, renamed, with its part-name updated.
            // Symbols without the property are copied unmodified.
            let mut sym = self.load_view(src_dir, &cell.cell_name, sym_view)?;
            sym.cell_name = cell.new_cell_name.clone();
            if sym.props.contains_key(PART_NAME_PROP) {
                sym.props.insert(
                    PART_NAME_PROP.to_string(),
                    ParamVal::Str(cell.new_cell_name.clone()),
                );
            } else {
                warn!("create_schematics: cannot find partName property, not modifying.");
            }
            self.save_view(&sym, &cell.new_cell_name, sym_view)?;
        }
        Ok(())
    }
    /// Load view `(cell, view)` from library directory `dir`
    fn load_view(&self, dir: &Path, cell: &str, view: &str) -> DbResult<SchCellView> {
        let path = find_view(dir, cell, view).ok_or_else(|| {
            DbError::open(format!("No view {} for cell {} in {}", view, cell, dir.display()))
        })?;
        Ok(SchCellView::open_from_path(&path)?)
    }
    /// Save `data` as view `(cell, view)` in our destination library
    fn save_view(&self, data: &SchCellView, cell: &str, view: &str) -> DbResult<()> {
        std::fs::create_dir_all(self.path.join(cell))?;
        data.save(self.fmt, view_path(&self.path, cell, view, self.fmt))?;
        Ok(())
    }
}
