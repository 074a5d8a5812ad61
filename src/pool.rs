//! Raw discovered-class pool handed over by the external classpath scanner.
//!
//! The scanner (out of scope here) walks a resolved classpath, introspects
//! each compiled class, and serializes what it found into this model. The
//! generator treats the pool as a pure data source: nothing in it is trusted
//! until the eligibility filter in [`crate::universe`] has vetted it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Kind of a discovered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
}

impl Default for TypeKind {
    fn default() -> Self {
        TypeKind::Class
    }
}

/// The complete pool of discovered types, grouped by originating module
/// (jar / classpath entry).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPool {
    /// Tag of the loading context the pool was scanned under. Types loaded
    /// by any other context (e.g. a bootstrap copy shadowing the intended
    /// class) are rejected by the filter.
    pub loader: String,
    pub modules: Vec<RawModule>,
}

impl RawPool {
    /// Load a pool from a scanner hand-off JSON file.
    pub fn from_file(path: &Path) -> Result<Self, GenError> {
        let text = fs::read_to_string(path).map_err(|source| GenError::PoolRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| GenError::PoolParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of types across all modules.
    pub fn type_count(&self) -> usize {
        self.modules.iter().map(|m| m.types.len()).sum()
    }

    /// Find a type by fully-qualified name.
    pub fn find_type(&self, name: &str) -> Option<&RawType> {
        self.modules
            .iter()
            .flat_map(|m| m.types.iter())
            .find(|t| t.name == name)
    }
}

/// One classpath entry's worth of discovered types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawModule {
    pub name: String,
    pub types: Vec<RawType>,
}

/// A single discovered type, as reported by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawType {
    /// Fully-qualified name.
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub is_public: bool,
    pub deprecated: bool,
    /// Tag of the context that loaded this type.
    pub loader: String,
    /// `false` when the scanner could not fully load the class (missing
    /// transitive dependency, broken packaging). Such entries are kept in
    /// the pool for accounting but are never eligible.
    pub loadable: bool,
    /// Fully-qualified names of superclasses and implemented interfaces.
    pub supertypes: Vec<String>,
    pub type_params: Vec<RawTypeParam>,
    pub constructors: Vec<RawConstructor>,
    pub methods: Vec<RawMethod>,
}

impl Default for RawType {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: TypeKind::Class,
            is_abstract: false,
            is_public: true,
            deprecated: false,
            loader: String::new(),
            loadable: true,
            supertypes: Vec::new(),
            type_params: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// A generic type parameter with its optional upper bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTypeParam {
    pub name: String,
    pub bound: Option<String>,
}

/// A discovered constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConstructor {
    pub is_public: bool,
    pub deprecated: bool,
    pub params: Vec<RawParam>,
}

impl Default for RawConstructor {
    fn default() -> Self {
        Self {
            is_public: true,
            deprecated: false,
            params: Vec::new(),
        }
    }
}

/// A constructor or method value parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParam {
    /// Fully-qualified type name; arrays use `[]` suffixes.
    pub type_name: String,
    pub vararg: bool,
}

/// A discovered method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMethod {
    pub name: String,
    pub is_public: bool,
    pub deprecated: bool,
    pub is_static: bool,
    pub params: Vec<RawParam>,
    /// `None` for void methods.
    pub return_type: Option<String>,
}

impl Default for RawMethod {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_public: true,
            deprecated: false,
            is_static: false,
            params: Vec::new(),
            return_type: None,
        }
    }
}
