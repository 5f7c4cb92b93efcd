////////////////////////////////////////////////////////////////////
// CellarConfig class
////////////////////////////////////////////////////////////////////

use std::fs;

use serde::{Deserialize, Serialize};

use shared_lib::cnv_error;

/// Construction options of a [crate::cellar::Cellar]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellarConfig {
    /// treat the first sequence of a table literal as the field names
    header: bool,
    /// None means strict only if a non-empty field list was supplied
    strict: Option<bool>,
    /// report field-name clashes
    warn: bool,
    /// field to build the secondary index on
    index: Option<String>,
}

impl CellarConfig {

    ////////////////////////////////////////////////////////////////////
    // Static Methods
    ////////////////////////////////////////////////////////////////////

    pub fn new() -> Self {
        Self {
            header: true,
            strict: None,
            warn: true,
            index: None,
        }
    }

    pub fn from_json(json: &str) -> std::io::Result<Self> {
        serde_json::from_str(json).map_err(|e| cnv_error!(e))
    }

    /// Reads the options from a JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    ////////////////////////////////////////////////////////////////////
    // Instance Methods
    ////////////////////////////////////////////////////////////////////

    pub fn get_index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn get_strict(&self) -> Option<bool> {
        self.strict
    }

    pub fn has_header(&self) -> bool {
        self.header
    }

    pub fn is_warning(&self) -> bool {
        self.warn
    }

    /// Decides strictness given whether any fields were supplied
    pub fn resolve_strict(&self, has_fields: bool) -> bool {
        self.strict.unwrap_or(has_fields)
    }

    pub fn to_json(&self) -> std::io::Result<String> {
        serde_json::to_string(self).map_err(|e| cnv_error!(e))
    }

    pub fn with_header(&self, header: bool) -> Self {
        let mut cfg = self.clone();
        cfg.header = header;
        cfg
    }

    pub fn with_index(&self, field: impl Into<String>) -> Self {
        let mut cfg = self.clone();
        cfg.index = Some(field.into());
        cfg
    }

    pub fn with_strict(&self, strict: bool) -> Self {
        let mut cfg = self.clone();
        cfg.strict = Some(strict);
        cfg
    }

    pub fn with_warnings(&self, warn: bool) -> Self {
        let mut cfg = self.clone();
        cfg.warn = warn;
        cfg
    }
}

impl Default for CellarConfig {
    fn default() -> Self { Self::new() }
}
