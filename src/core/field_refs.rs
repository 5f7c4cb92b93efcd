////////////////////////////////////////////////////////////////////
// field references module
////////////////////////////////////////////////////////////////////

use std::fmt::Display;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::cell_values::CellValue;
use crate::errors::throw;
use crate::errors::Errors::UnsupportedReferenceKind;

/// Identifies one or more fields: by name, by position or by a span of either
#[derive(Clone, Debug, PartialEq)]
pub enum FieldRef {
    Name(String),
    Index(i64),
    Range {
        from: Option<Box<FieldRef>>,
        to: Option<Box<FieldRef>>,
        exclusive: bool,
    },
}

impl FieldRef {
    /// Creates a span between two references; absent bounds mean "first" and "last"
    pub fn span(from: Option<FieldRef>, to: Option<FieldRef>, exclusive: bool) -> Self {
        FieldRef::Range {
            from: from.map(Box::new),
            to: to.map(Box::new),
            exclusive,
        }
    }

    /// Inclusive span between two references
    /// ex: FieldRef::between("b", "d")
    pub fn between(from: impl Into<FieldRef>, to: impl Into<FieldRef>) -> Self {
        Self::span(Some(from.into()), Some(to.into()), false)
    }

    /// Creates a reference from a cell; only strings and integers can reference fields
    pub fn from_value(value: &CellValue) -> std::io::Result<Self> {
        match value {
            CellValue::StringValue(name) => Ok(FieldRef::Name(name.to_string())),
            CellValue::Integer(index) => Ok(FieldRef::Index(*index)),
            other => throw(UnsupportedReferenceKind(
                format!("{} [{}]", other.kind_name(), other.to_code())))
        }
    }

    /// Returns true for an absent-like bound: an empty or whitespace-only name
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldRef::Name(name) if name.trim().is_empty())
    }

    /// Returns a description of the reference kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldRef::Name(..) => "Name",
            FieldRef::Index(..) => "Index",
            FieldRef::Range { .. } => "Range",
        }
    }
}

impl Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRef::Name(name) => write!(f, "{name:?}"),
            FieldRef::Index(index) => write!(f, "{index}"),
            FieldRef::Range { from, to, exclusive } => {
                let bound = |b: &Option<Box<FieldRef>>| b.as_ref()
                    .map(|r| r.to_string()).unwrap_or_default();
                write!(f, "{}{}{}", bound(from), if *exclusive { "..." } else { ".." }, bound(to))
            }
        }
    }
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self { FieldRef::Name(name.to_string()) }
}

impl From<String> for FieldRef {
    fn from(name: String) -> Self { FieldRef::Name(name) }
}

impl From<&String> for FieldRef {
    fn from(name: &String) -> Self { FieldRef::Name(name.to_string()) }
}

impl From<i32> for FieldRef {
    fn from(index: i32) -> Self { FieldRef::Index(index as i64) }
}

impl From<i64> for FieldRef {
    fn from(index: i64) -> Self { FieldRef::Index(index) }
}

impl From<usize> for FieldRef {
    fn from(index: usize) -> Self { FieldRef::Index(index as i64) }
}

impl<T: Into<FieldRef>> From<Range<T>> for FieldRef {
    fn from(range: Range<T>) -> Self {
        Self::span(Some(range.start.into()), Some(range.end.into()), true)
    }
}

impl<T: Into<FieldRef>> From<RangeInclusive<T>> for FieldRef {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Self::span(Some(start.into()), Some(end.into()), false)
    }
}

impl<T: Into<FieldRef>> From<RangeFrom<T>> for FieldRef {
    fn from(range: RangeFrom<T>) -> Self {
        Self::span(Some(range.start.into()), None, false)
    }
}

impl<T: Into<FieldRef>> From<RangeTo<T>> for FieldRef {
    fn from(range: RangeTo<T>) -> Self {
        Self::span(None, Some(range.end.into()), true)
    }
}

impl<T: Into<FieldRef>> From<RangeToInclusive<T>> for FieldRef {
    fn from(range: RangeToInclusive<T>) -> Self {
        Self::span(None, Some(range.end.into()), false)
    }
}

impl From<RangeFull> for FieldRef {
    fn from(_: RangeFull) -> Self {
        Self::span(None, None, false)
    }
}
