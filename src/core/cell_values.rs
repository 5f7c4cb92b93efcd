////////////////////////////////////////////////////////////////////
// CellValue class
////////////////////////////////////////////////////////////////////

use std::fmt::Display;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_lib::is_blank_text;

use crate::cell_values::CellValue::*;

/// Builds a [Vec] of [CellValue]s from literals
/// ex: cells!["Ada", 36, 1.5, true]
#[macro_export]
macro_rules! cells {
    () => { Vec::<$crate::cell_values::CellValue>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::cell_values::CellValue::from($value)),+]
    };
}

/// An opaque cell of tabular data
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    StringValue(String),
}

impl CellValue {

    ////////////////////////////////////////////////////////////////////
    //  Static Methods
    ////////////////////////////////////////////////////////////////////

    /// Converts a JSON value into a cell; composite JSON values are kept as their JSON text
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Null,
            Value::Bool(b) => Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Integer(i),
                None => n.as_f64().map(Float).unwrap_or(Null)
            },
            Value::String(s) => StringValue(s.to_string()),
            other => StringValue(other.to_string()),
        }
    }

    ////////////////////////////////////////////////////////////////////
    //  Instance Methods
    ////////////////////////////////////////////////////////////////////

    /// Returns true if the cell carries no meaningful content:
    /// Null, false, or a string that is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Null => true,
            Boolean(b) => !*b,
            Integer(..) | Float(..) => false,
            StringValue(s) => is_blank_text(s),
        }
    }

    pub fn is_present(&self) -> bool { !self.is_blank() }

    /// Returns the alternative if this cell is blank
    pub fn if_blank(self, alternative: CellValue) -> CellValue {
        if self.is_blank() { alternative } else { self }
    }

    /// Returns the cell only if it is not blank
    pub fn if_present(&self) -> Option<&CellValue> {
        if self.is_blank() { None } else { Some(self) }
    }

    /// Returns the kind of the cell (e.g. "Integer")
    pub fn kind_name(&self) -> &'static str {
        match self {
            Null => "Null",
            Boolean(..) => "Boolean",
            Integer(..) => "Integer",
            Float(..) => "Float",
            StringValue(..) => "String",
        }
    }

    /// Returns the inspection form of the cell (strings are quoted)
    pub fn to_code(&self) -> String {
        match self {
            StringValue(s) => format!("{s:?}"),
            Null => "null".into(),
            other => other.unwrap_value(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Null => Value::Null,
            Boolean(b) => Value::Bool(*b),
            Integer(i) => Value::from(*i),
            Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            StringValue(s) => Value::String(s.to_string()),
        }
    }

    /// Returns a copy of the cell with surrounding whitespace removed from string content
    pub fn trimmed(&self) -> CellValue {
        match self {
            StringValue(s) => StringValue(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Returns the display text of the cell; Null displays as an empty string
    pub fn unwrap_value(&self) -> String {
        match self {
            Null => String::new(),
            Boolean(b) => b.to_string(),
            Integer(i) => i.to_string(),
            Float(f) => f.to_string(),
            StringValue(s) => s.to_string(),
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unwrap_value())
    }
}

// floats compare bitwise so that cells can serve as index keys
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (StringValue(a), StringValue(b)) => a == b,
            _ => false
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Null => {}
            Boolean(b) => b.hash(state),
            Integer(i) => i.hash(state),
            Float(f) => f.to_bits().hash(state),
            StringValue(s) => s.hash(state),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self { StringValue(value.to_string()) }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self { StringValue(value) }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self { StringValue(value.to_string()) }
}

impl From<&CellValue> for CellValue {
    fn from(value: &CellValue) -> Self { value.clone() }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self { Boolean(value) }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self { Integer(value as i64) }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self { Integer(value) }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self { Integer(value as i64) }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self { Float(value) }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(|v| v.into()).unwrap_or(Null)
    }
}
