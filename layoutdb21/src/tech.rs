//!
//! # Technology Data Module
//!
//! Defines the [Tech] database: the per-process data a library resolves
//! names against when cell views are written. Comprises the database-unit
//! scale, layer and purpose definitions (name-to-number, both directions),
//! and standard via-definitions.
//!
//! A [Tech] is itself an on-disk artifact, stored inside a library
//! directory as `tech.<fmt>`; libraries without one record an *attached*
//! technology-library name and resolve through it instead.
//!

// Std-Lib
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Crates.io
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

// Local imports
use crate::error::{DbError, DbResult};
use crate::geom::Dbu;
use crate::utils::{SerdeFile, SerializationFormat};

/// # Layer-Number Type-Alias
pub type LayerNum = u32;
/// # Purpose-Number Type-Alias
pub type PurposeNum = u32;

/// The reserved number of the default `drawing` purpose,
/// pre-seeded into every new [Purposes] set.
pub const DRAWING_PURPOSE: PurposeNum = 0;
/// Name of the default purpose
pub static DRAWING: Lazy<String> = Lazy::new(|| "drawing".to_string());

// Create key-types for each internal type stored in [SlotMap]s
new_key_type! {
    /// Keys for [Layer] entries
    pub struct LayerKey;
}

/// # Layer Definition
///
/// Pairs a process-layer name with its number.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Layer {
    /// Layer Number
    pub num: LayerNum,
    /// Layer Name
    pub name: String,
}
impl Layer {
    /// Create a new [Layer] with the given `num` and `name`
    pub fn new(num: LayerNum, name: impl Into<String>) -> Self {
        Self {
            num,
            name: name.into(),
        }
    }
}

/// # Layer Set & Manager
///
/// Keep track of active layers, and index them by name and number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layers {
    slots: SlotMap<LayerKey, Layer>,
    nums: HashMap<LayerNum, LayerKey>,
    names: HashMap<String, LayerKey>,
}
impl Layers {
    /// Add a [Layer] to our slot-map, number-map, and name-map.
    /// Re-registration of an existing name or number over-writes the prior index entry.
    pub fn add(&mut self, layer: Layer) -> LayerKey {
        let num = layer.num;
        let name = layer.name.clone();
        let key = self.slots.insert(layer);
        self.nums.insert(num, key);
        self.names.insert(name, key);
        key
    }
    /// Get the [LayerKey] for layer-number `num`
    pub fn keynum(&self, num: LayerNum) -> Option<LayerKey> {
        self.nums.get(&num).copied()
    }
    /// Get the [LayerKey] for layer-name `name`
    pub fn keyname(&self, name: &str) -> Option<LayerKey> {
        self.names.get(name).copied()
    }
    /// Get a reference to [Layer] number `num`
    pub fn num(&self, num: LayerNum) -> Option<&Layer> {
        let key = self.nums.get(&num)?;
        self.slots.get(*key)
    }
    /// Get a reference to [Layer] name `name`
    pub fn name(&self, name: &str) -> Option<&Layer> {
        let key = self.names.get(name)?;
        self.slots.get(*key)
    }
    /// Get a reference to [Layer] from [LayerKey] `key`
    pub fn get(&self, key: LayerKey) -> Option<&Layer> {
        self.slots.get(key)
    }
    /// Iterate over all [Layer]s, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.slots.values()
    }
}

/// # Purpose Set & Manager
///
/// Purposes form a namespace independent of layers;
/// any layer-number may pair with any purpose-number.
/// New sets are seeded with the reserved `drawing` purpose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Purposes {
    names: HashMap<String, PurposeNum>,
    nums: HashMap<PurposeNum, String>,
}
impl Default for Purposes {
    fn default() -> Self {
        let mut this = Self {
            names: HashMap::new(),
            nums: HashMap::new(),
        };
        this.add(DRAWING.clone(), DRAWING_PURPOSE);
        this
    }
}
impl Purposes {
    /// Register purpose `name` with number `num`
    pub fn add(&mut self, name: impl Into<String>, num: PurposeNum) {
        let name = name.into();
        self.names.insert(name.clone(), num);
        self.nums.insert(num, name);
    }
    /// Get the number for purpose-name `name`
    pub fn num(&self, name: &str) -> Option<PurposeNum> {
        self.names.get(name).copied()
    }
    /// Get the name for purpose-number `num`
    pub fn name(&self, num: PurposeNum) -> Option<&str> {
        self.nums.get(&num).map(String::as_str)
    }
    /// Iterate over all (name, number) pairs, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, PurposeNum)> {
        self.names.iter().map(|(name, num)| (name.as_str(), *num))
    }
}

/// # Standard Via-Definition
///
/// Names the bottom, cut, and top layers connected by a via of this kind,
/// and carries its default cut dimensions, cut-to-cut spacing,
/// and per-layer enclosures. All dimensions are database units.
/// Layers are referenced by *name*, resolved through the opening
/// library's layer map at write time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViaDef {
    /// Via-Definition Name
    pub name: String,
    /// Bottom-Layer Name
    pub bot_layer: String,
    /// Cut-Layer Name
    pub cut_layer: String,
    /// Top-Layer Name
    pub top_layer: String,
    /// Default Cut Dimensions (width, height)
    pub cut_size: (Dbu, Dbu),
    /// Default Cut-to-Cut Spacing (x, y)
    pub cut_spacing: (Dbu, Dbu),
    /// Default Bottom-Layer Enclosure (x, y margins)
    pub enc1: (Dbu, Dbu),
    /// Default Top-Layer Enclosure (x, y margins)
    pub enc2: (Dbu, Dbu),
}

/// # Via-Definition Set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViaDefs {
    /// Definitions, in registration order
    pub defs: Vec<ViaDef>,
}
impl ViaDefs {
    /// Add via-definition `def`
    pub fn add(&mut self, def: ViaDef) {
        self.defs.push(def);
    }
    /// Find the via-definition named `name`
    pub fn find(&self, name: &str) -> Option<&ViaDef> {
        self.defs.iter().find(|d| d.name == name)
    }
}

/// # Technology Database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tech {
    /// Technology Name
    pub name: String,
    /// Database Units per User Unit (micron)
    pub dbu_per_uu: u32,
    /// Manufacturing-Grid Resolution, in database units
    pub mfg_grid: Dbu,
    /// Layer Definitions
    pub layers: Layers,
    /// Purpose Definitions
    pub purposes: Purposes,
    /// Via Definitions
    pub viadefs: ViaDefs,
}
impl Default for Tech {
    fn default() -> Self {
        Self {
            name: String::new(),
            dbu_per_uu: 1000,
            mfg_grid: 1,
            layers: Layers::default(),
            purposes: Purposes::default(),
            viadefs: ViaDefs::default(),
        }
    }
}
impl SerdeFile for Tech {}
impl Tech {
    /// Create a new [Tech] named `name`, with default units and empty definitions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// The technology file-name for format `fmt`
    pub fn file_name(fmt: SerializationFormat) -> String {
        format!("tech.{}", fmt.extension())
    }
    /// Save into library directory `dir`, as `tech.<fmt>`
    pub fn save_in(&self, dir: impl AsRef<Path>, fmt: SerializationFormat) -> DbResult<()> {
        self.save(fmt, dir.as_ref().join(Self::file_name(fmt)))?;
        Ok(())
    }
    /// Locate a technology file inside library directory `dir`, if one exists
    pub fn find_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
        use SerializationFormat::{Json, Toml, Yaml};
        for fmt in [Yaml, Json, Toml] {
            let path = dir.as_ref().join(Self::file_name(fmt));
            if path.is_file() {
                return Some(path);
            }
        }
        None
    }
    /// Open from the technology file inside library directory `dir`.
    /// Returns `Ok(None)` if the directory has no technology file.
    pub fn open_in(dir: impl AsRef<Path>) -> DbResult<Option<Self>> {
        match Self::find_in(&dir) {
            None => Ok(None),
            Some(path) => {
                let tech = Self::open_from_path(&path).map_err(|e| {
                    DbError::open(format!(
                        "Cannot read technology file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Some(tech))
            }
        }
    }
}
