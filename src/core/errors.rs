////////////////////////////////////////////////////////////////////
// Errors class
////////////////////////////////////////////////////////////////////

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Represents an Error Message
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Errors {
    ArityMismatch(usize, usize),
    DuplicateKey(String),
    IndexOutOfRange(i64, usize),
    NoIndexSpec,
    NoRowsDefined,
    ShapeMismatch(String),
    UnknownField(String),
    UnsupportedReferenceKind(String),
}

impl Errors {
    /// Recovers the [Errors] value carried by an [std::io::Error] raised via [throw]
    pub fn of(error: &std::io::Error) -> Option<&Errors> {
        error.get_ref().and_then(|e| e.downcast_ref::<Errors>())
    }
}

impl Display for Errors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Errors::ArityMismatch(values, fields) =>
                format!("Unable to assign {values} values to {fields} fields"),
            Errors::DuplicateKey(key) =>
                format!("Duplicate index: {key}"),
            Errors::IndexOutOfRange(index, count) =>
                format!("No field at index {index} (field count {count})"),
            Errors::NoIndexSpec =>
                String::from("Index needs a field or a derivation function"),
            Errors::NoRowsDefined =>
                String::from("No rows defined"),
            Errors::ShapeMismatch(desc) =>
                format!("Unable to use {desc} as a row"),
            Errors::UnknownField(name) =>
                format!("No field \"{name}\""),
            Errors::UnsupportedReferenceKind(desc) =>
                format!("Unable to index fields by {desc}"),
        };
        write!(f, "{text}")
    }
}

impl std::error::Error for Errors {}

pub fn throw<A>(error: Errors) -> std::io::Result<A> {
    Err(std::io::Error::new(std::io::ErrorKind::Other, error))
}
