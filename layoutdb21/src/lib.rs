//!
//! # LayoutDb21 Layout Cell-Database
//!
//! A native cell-database for IC layout generators:
//! micron-coordinate [layout::Layout] builders are resolved against a
//! [tech::Tech]nology - layer and purpose names to numbers, microns to
//! integer database units, via-definitions to their expanded geometry -
//! and persisted as serialized [cell::CellView]s inside named, on-disk
//! [library::LayoutLibrary] directories, themselves registered through
//! [libdefs21]-format library-definition files.
//!

// Internal modules & re-exports
pub use layoutdb21utils as utils;

// Modules
pub mod bbox;
pub mod cell;
pub mod error;
pub mod geom;
pub mod layout;
pub mod library;
pub mod sch;
pub mod tech;

#[cfg(test)]
mod tests;

// Re-exports of the most common types
pub use error::{DbError, DbResult};
pub use geom::{Dbu, Orient, Point};
pub use layout::{Layout, Micron};
pub use library::LayoutLibrary;
pub use sch::SchematicWriter;
pub use tech::Tech;
