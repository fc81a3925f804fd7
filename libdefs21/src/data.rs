//!
//! # Library-Definition Data Model
//!

// Std-Lib
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local imports
use crate::utils::{enumstr, EnumStr, SerdeFile};

enumstr!(
    /// # Library-Definition Statement Keywords
    ///
    /// Keywords are written upper-case, and matched case-insensitively when read.
    LibDefsKey {
        Define: "DEFINE",
        Include: "INCLUDE",
        SoftInclude: "SOFTINCLUDE",
        Undefine: "UNDEFINE",
    }
);
impl LibDefsKey {
    /// Parse and convert from case-insensitive string `txt`
    pub(crate) fn parse(txt: &str) -> Option<Self> {
        Self::from_str(&txt.to_ascii_uppercase())
    }
}

/// # Single Library Definition
///
/// Pairs a library name with the directory holding its content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibDef {
    /// Library Name
    pub name: String,
    /// Library Directory
    pub path: PathBuf,
}
impl LibDef {
    /// Create a new [LibDef]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// # Library-Definition Statement
///
/// One line of a lib-defs file.
/// Comments and blank lines are dropped at parse-time and do not appear here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum LibDefsStmt {
    /// Define a library name-to-path mapping
    Define(LibDef),
    /// Include another lib-defs file.
    /// `soft` includes silently skip missing files; hard includes fail on them.
    Include { path: PathBuf, soft: bool },
    /// Remove a previously defined library
    Undefine(String),
}

/// # Library-Definition File
///
/// An ordered list of [LibDefsStmt]s, as parsed from a single file.
/// Statement order is meaningful: later definitions override earlier ones,
/// and undefines apply to whatever has accumulated before them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibDefs {
    /// Statements, in file order
    pub statements: Vec<LibDefsStmt>,
}
impl LibDefs {
    /// Resolve our statements into a [LibDefsTable],
    /// chasing `INCLUDE`s relative to directory `base_dir`.
    pub fn resolve(&self, base_dir: impl AsRef<Path>) -> LibDefsResult<LibDefsTable> {
        let mut table = LibDefsTable::default();
        let mut visited = HashSet::new();
        self.resolve_into(base_dir.as_ref(), &mut table, &mut visited)?;
        Ok(table)
    }
    /// Recursive worker for [LibDefs::resolve].
    /// `visited` holds the canonicalized paths of every file on the active
    /// include-stack plus those already processed; re-entry is a cycle.
    fn resolve_into(
        &self,
        base_dir: &Path,
        table: &mut LibDefsTable,
        visited: &mut HashSet<PathBuf>,
    ) -> LibDefsResult<()> {
        for stmt in &self.statements {
            match stmt {
                LibDefsStmt::Define(def) => {
                    // Relative library paths are anchored at the defining file's directory
                    let path = if def.path.is_relative() {
                        base_dir.join(&def.path)
                    } else {
                        def.path.clone()
                    };
                    table.define(LibDef::new(&def.name, path));
                }
                LibDefsStmt::Undefine(name) => table.undefine(name),
                LibDefsStmt::Include { path, soft } => {
                    let path = if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path.clone()
                    };
                    if !path.is_file() {
                        if *soft {
                            continue; // SOFTINCLUDE of a missing file: skip
                        }
                        return Err(LibDefsError::Str(format!(
                            "Missing include file: {}",
                            path.display()
                        )));
                    }
                    let canon = path.canonicalize()?;
                    if !visited.insert(canon) {
                        return Err(LibDefsError::Cycle { path });
                    }
                    let included = crate::read::parse_file(&path)?;
                    let next_base = path.parent().unwrap_or(base_dir).to_path_buf();
                    included.resolve_into(&next_base, table, visited)?;
                }
            }
        }
        Ok(())
    }
}
impl SerdeFile for LibDefs {}

/// # Resolved Library-Definition Table
///
/// The flattened outcome of resolving one or more lib-defs files:
/// an ordered set of name-to-path definitions with includes chased,
/// re-definitions applied, and undefined entries removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibDefsTable {
    /// Surviving definitions, in order of (first) definition
    pub defs: Vec<LibDef>,
}
impl LibDefsTable {
    /// Add or override the definition for `def.name`
    pub fn define(&mut self, def: LibDef) {
        match self.defs.iter_mut().find(|d| d.name == def.name) {
            Some(existing) => existing.path = def.path,
            None => self.defs.push(def),
        }
    }
    /// Remove the definition for `name`, if any
    pub fn undefine(&mut self, name: &str) {
        self.defs.retain(|d| d.name != name);
    }
    /// Get the path defined for library `name`
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.defs
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.path.as_path())
    }
}

/// # Libdefs Error Enumeration
#[derive(Debug)]
pub enum LibDefsError {
    /// Lexer Errors
    Lex {
        next_char: Option<char>,
        line: usize,
        pos: usize,
    },
    /// Parser Errors
    Parse {
        message: String,
        line: usize,
        token: String,
    },
    /// Include-Cycle Errors
    Cycle { path: PathBuf },
    /// Wrapped errors, generally from other crates
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// String message-valued errors
    Str(String),
}
impl From<crate::utils::ser::Error> for LibDefsError {
    fn from(e: crate::utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::io::Error> for LibDefsError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<String> for LibDefsError {
    fn from(e: String) -> Self {
        Self::Str(e)
    }
}
impl From<&str> for LibDefsError {
    fn from(e: &str) -> Self {
        Self::Str(e.into())
    }
}
impl std::fmt::Display for LibDefsError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for LibDefsError {}

/// Libdefs21 Library-Wide Result Type
pub type LibDefsResult<T> = Result<T, LibDefsError>;
