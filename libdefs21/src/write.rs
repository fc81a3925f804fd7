//!
//! # Library-Definition Writing Module
//!

// Std-Lib
use std::io::Write;
use std::path::Path;

// Local imports
use super::data::*;
use crate::utils::EnumStr;

/// Write a [LibDefs] to file `fname`
pub fn save(libdefs: &LibDefs, fname: impl AsRef<Path>) -> LibDefsResult<()> {
    let f = std::fs::File::create(fname)?;
    LibDefsWriter::new(f).write_lib_defs(libdefs)
}
/// Write a [LibDefs] to lib-defs-format [String]
pub fn to_string(libdefs: &LibDefs) -> LibDefsResult<String> {
    let mut buf = Vec::new();
    LibDefsWriter::new(&mut buf).write_lib_defs(libdefs)?;
    let rv = std::str::from_utf8(buf.as_slice())
        .map_err(|e| LibDefsError::Boxed(Box::new(e)))?
        .to_string();
    Ok(rv)
}
/// Append a single `DEFINE name path` statement to existing file `fname`.
/// Used when registering a newly created library with an existing lib-defs file.
pub fn append_define(
    fname: impl AsRef<Path>,
    name: &str,
    path: impl AsRef<Path>,
) -> LibDefsResult<()> {
    let mut file = std::fs::OpenOptions::new().append(true).open(fname)?;
    writeln!(
        file,
        "{} {} {}",
        LibDefsKey::Define,
        name,
        path.as_ref().display()
    )?;
    Ok(())
}

/// # Lib-Defs Writing Helper
pub struct LibDefsWriter<'wr> {
    /// Write Destination
    dest: Box<dyn Write + 'wr>,
}
impl<'wr> LibDefsWriter<'wr> {
    /// Create a new [LibDefsWriter] to destination `dest`.
    /// Destination is boxed internally.
    fn new(dest: impl Write + 'wr) -> Self {
        Self {
            dest: Box::new(dest),
        }
    }
    /// Write statements in order, one per line
    fn write_lib_defs(&mut self, libdefs: &LibDefs) -> LibDefsResult<()> {
        for stmt in &libdefs.statements {
            self.write_stmt(stmt)?;
        }
        self.dest.flush()?;
        Ok(())
    }
    /// Write a single [LibDefsStmt]
    fn write_stmt(&mut self, stmt: &LibDefsStmt) -> LibDefsResult<()> {
        use LibDefsKey::{Define, Include, SoftInclude, Undefine};
        match stmt {
            LibDefsStmt::Define(def) => writeln!(
                self.dest,
                "{} {} {}",
                Define.to_str(),
                def.name,
                def.path.display()
            )?,
            LibDefsStmt::Include { path, soft } => {
                let key = if *soft { SoftInclude } else { Include };
                writeln!(self.dest, "{} {}", key.to_str(), path.display())?
            }
            LibDefsStmt::Undefine(name) => {
                writeln!(self.dest, "{} {}", Undefine.to_str(), name)?
            }
        }
        Ok(())
    }
}
