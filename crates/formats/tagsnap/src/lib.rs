//! JSON-backed tag snapshot: the shipped stand-in for the engine's tag
//! subsystem.
//!
//! A snapshot holds named blocks of elements; each element maps a field key
//! (the rendered path below the block element) to one typed value. The
//! whole structure serializes with serde, so a snapshot file is an ordinary
//! JSON document a test or another tool can author directly.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use lightport_core::accessor::{FieldAccessor, TagHandle, TagStore};
use lightport_core::error::{Error, Result};
use lightport_core::path::FieldPath;

/// One stored field value. The variant is the value kind; width distinctions
/// within a kind (short vs long enums, word vs long flags) live in the path
/// grammar, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    Enum(i32),
    Flags(u32),
    Integer(i32),
    Scalar(f32),
    Vector3([f32; 3]),
    Bounds([f32; 2]),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Enum(_) => "enum",
            FieldValue::Flags(_) => "flags",
            FieldValue::Integer(_) => "integer",
            FieldValue::Scalar(_) => "scalar",
            FieldValue::Vector3(_) => "vector3",
            FieldValue::Bounds(_) => "bounds",
        }
    }
}

type Element = BTreeMap<String, FieldValue>;

/// In-memory tag document with block-structured typed fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagSnapshot {
    #[serde(default)]
    blocks: BTreeMap<String, Vec<Element>>,
}

impl TagSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    fn element(&self, path: &FieldPath) -> Result<&Element> {
        let not_found = || Error::FieldNotFound {
            path: path.to_string(),
        };
        let block = self.blocks.get(path.block_name().unwrap_or_default());
        let index = path.element_index().ok_or_else(not_found)?;
        block.and_then(|b| b.get(index)).ok_or_else(not_found)
    }

    fn field(&self, path: &FieldPath) -> Result<&FieldValue> {
        self.element(path)?
            .get(&path.field_key())
            .ok_or_else(|| Error::FieldNotFound {
                path: path.to_string(),
            })
    }

    /// Write a field, creating it on first write. A field keeps the kind it
    /// was created with; writing a different kind is a type mismatch.
    fn put(&mut self, path: &FieldPath, value: FieldValue) -> Result<()> {
        let not_found = || Error::FieldNotFound {
            path: path.to_string(),
        };
        let index = path.element_index().ok_or_else(not_found)?;
        let element = self
            .blocks
            .get_mut(path.block_name().unwrap_or_default())
            .and_then(|b| b.get_mut(index))
            .ok_or_else(not_found)?;
        let key = path.field_key();
        if let Some(existing) = element.get(&key) {
            if std::mem::discriminant(existing) != std::mem::discriminant(&value) {
                return Err(Error::TypeMismatch {
                    path: path.to_string(),
                    expected: existing.kind_name(),
                });
            }
        }
        element.insert(key, value);
        Ok(())
    }

    fn typed<T>(
        &self,
        path: &FieldPath,
        expected: &'static str,
        extract: impl Fn(&FieldValue) -> Option<T>,
    ) -> Result<T> {
        let value = self.field(path)?;
        extract(value).ok_or_else(|| Error::TypeMismatch {
            path: path.to_string(),
            expected,
        })
    }
}

impl FieldAccessor for TagSnapshot {
    fn block_count(&self, block: &FieldPath) -> Result<usize> {
        // A block field always exists in the tag schema; a snapshot that
        // never wrote one is an empty block, not a missing field.
        let name = block.block_name().unwrap_or_default();
        Ok(self.blocks.get(name).map(Vec::len).unwrap_or(0))
    }

    fn append_block_element(&mut self, block: &FieldPath) -> Result<usize> {
        let name = block.block_name().unwrap_or_default();
        let elements = self.blocks.entry(name.to_owned()).or_default();
        elements.push(Element::new());
        Ok(elements.len() - 1)
    }

    fn get_enum(&self, path: &FieldPath) -> Result<i32> {
        self.typed(path, "enum", |v| match v {
            FieldValue::Enum(value) => Some(*value),
            _ => None,
        })
    }

    fn set_enum(&mut self, path: &FieldPath, value: i32) -> Result<()> {
        self.put(path, FieldValue::Enum(value))
    }

    fn get_flags(&self, path: &FieldPath) -> Result<u32> {
        self.typed(path, "flags", |v| match v {
            FieldValue::Flags(value) => Some(*value),
            _ => None,
        })
    }

    fn set_flags(&mut self, path: &FieldPath, value: u32) -> Result<()> {
        self.put(path, FieldValue::Flags(value))
    }

    fn get_integer(&self, path: &FieldPath) -> Result<i32> {
        self.typed(path, "integer", |v| match v {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        })
    }

    fn set_integer(&mut self, path: &FieldPath, value: i32) -> Result<()> {
        self.put(path, FieldValue::Integer(value))
    }

    fn get_scalar(&self, path: &FieldPath) -> Result<f32> {
        self.typed(path, "scalar", |v| match v {
            FieldValue::Scalar(value) => Some(*value),
            _ => None,
        })
    }

    fn set_scalar(&mut self, path: &FieldPath, value: f32) -> Result<()> {
        self.put(path, FieldValue::Scalar(value))
    }

    fn get_vector3(&self, path: &FieldPath) -> Result<[f32; 3]> {
        self.typed(path, "vector3", |v| match v {
            FieldValue::Vector3(value) => Some(*value),
            _ => None,
        })
    }

    fn set_vector3(&mut self, path: &FieldPath, value: [f32; 3]) -> Result<()> {
        self.put(path, FieldValue::Vector3(value))
    }

    fn get_bounds(&self, path: &FieldPath) -> Result<[f32; 2]> {
        self.typed(path, "bounds", |v| match v {
            FieldValue::Bounds(value) => Some(*value),
            _ => None,
        })
    }

    fn set_bounds(&mut self, path: &FieldPath, value: [f32; 2]) -> Result<()> {
        self.put(path, FieldValue::Bounds(value))
    }
}

/// A snapshot bound to its file. Saving writes the file; dropping the
/// handle releases it without writing.
#[derive(Debug)]
pub struct SnapshotTag {
    path: PathBuf,
    snapshot: TagSnapshot,
}

impl SnapshotTag {
    /// Load a snapshot file.
    pub fn load(path: PathBuf) -> Result<Self> {
        let text = fs::read_to_string(&path).map_err(|e| Error::AssetUnavailable {
            message: format!("{}: {e}", path.display()),
        })?;
        let snapshot = serde_json::from_str(&text).map_err(|e| Error::AssetUnavailable {
            message: format!("{}: {e}", path.display()),
        })?;
        Ok(Self { path, snapshot })
    }

    /// Start an empty snapshot that will be written to `path` on save.
    pub fn create(path: PathBuf) -> Self {
        Self {
            path,
            snapshot: TagSnapshot::new(),
        }
    }

    pub fn snapshot(&self) -> &TagSnapshot {
        &self.snapshot
    }
}

macro_rules! forward {
    ($($get:ident -> $ty:ty, $set:ident;)*) => {
        $(
            fn $get(&self, path: &FieldPath) -> Result<$ty> {
                self.snapshot.$get(path)
            }
            fn $set(&mut self, path: &FieldPath, value: $ty) -> Result<()> {
                self.snapshot.$set(path, value)
            }
        )*
    };
}

impl FieldAccessor for SnapshotTag {
    fn block_count(&self, block: &FieldPath) -> Result<usize> {
        self.snapshot.block_count(block)
    }

    fn append_block_element(&mut self, block: &FieldPath) -> Result<usize> {
        self.snapshot.append_block_element(block)
    }

    forward! {
        get_enum -> i32, set_enum;
        get_flags -> u32, set_flags;
        get_integer -> i32, set_integer;
        get_scalar -> f32, set_scalar;
        get_vector3 -> [f32; 3], set_vector3;
        get_bounds -> [f32; 2], set_bounds;
    }
}

impl TagHandle for SnapshotTag {
    fn save(&mut self) -> Result<()> {
        let text =
            serde_json::to_string_pretty(&self.snapshot).map_err(|e| Error::AssetUnavailable {
                message: format!("{}: {e}", self.path.display()),
            })?;
        fs::write(&self.path, text).map_err(|e| Error::AssetUnavailable {
            message: format!("{}: {e}", self.path.display()),
        })
    }
}

/// Opens snapshot files by path.
#[derive(Debug, Default)]
pub struct SnapshotTagStore {
    /// When set, a missing locator opens as an empty snapshot instead of
    /// failing — injection into a fresh asset.
    pub create_missing: bool,
}

impl SnapshotTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creating_missing() -> Self {
        Self {
            create_missing: true,
        }
    }
}

impl TagStore for SnapshotTagStore {
    type Handle = SnapshotTag;

    fn open(&self, locator: &str) -> Result<SnapshotTag> {
        let path = PathBuf::from(locator);
        if path.exists() {
            SnapshotTag::load(path)
        } else if self.create_missing {
            Ok(SnapshotTag::create(path))
        } else {
            Err(Error::AssetUnavailable {
                message: format!("{}: no such snapshot", path.display()),
            })
        }
    }
}
