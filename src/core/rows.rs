////////////////////////////////////////////////////////////////////
// rows module
////////////////////////////////////////////////////////////////////

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::cell_values::CellValue;
use crate::cell_values::CellValue::Null;
use crate::errors::throw;
use crate::errors::Errors::{ArityMismatch, IndexOutOfRange};
use crate::field_refs::FieldRef;
use crate::field_resolver::{FieldResolver, Resolved};
use crate::field_table::FieldTable;

/// Represents the cells of a single row, aligned positionally with a [FieldTable].
/// A row may hold fewer cells than there are fields; missing cells read as Null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<CellValue>,
}

/// The result of reading one or more field references
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched {
    One(CellValue),
    Many(Vec<CellValue>),
}

impl Fetched {
    /// Returns the single value, if this is one
    pub fn value(&self) -> Option<&CellValue> {
        match self {
            Fetched::One(value) => Some(value),
            Fetched::Many(..) => None,
        }
    }

    pub fn into_values(self) -> Vec<CellValue> {
        match self {
            Fetched::One(value) => vec![value],
            Fetched::Many(values) => values,
        }
    }
}

/// A pending assignment target
enum Slot {
    Known(Vec<usize>),
    New(String),
}

impl Row {

    ////////////////////////////////////////////////////////////////////
    //      Constructors
    ////////////////////////////////////////////////////////////////////

    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    /// Returns an empty row.
    pub const fn empty() -> Self {
        Self { values: Vec::new() }
    }

    ////////////////////////////////////////////////////////////////////
    //      Instance Methods
    ////////////////////////////////////////////////////////////////////

    /// Returns the cells padded with Null or truncated to the given width
    pub fn aligned(&self, width: usize) -> Vec<CellValue> {
        let mut values: Vec<CellValue> = self.values.iter().take(width).cloned().collect();
        values.resize(width, Null);
        values
    }

    /// Assigns values to the referenced fields, left to right.
    /// Unknown names are appended to the field table; with no references
    /// the whole row is replaced. Fewer values than positions leaves Null
    /// in the remaining positions; more values than positions fails before
    /// anything is modified.
    pub fn assign(
        &mut self,
        fields: &mut FieldTable,
        refs: &[FieldRef],
        values: Vec<CellValue>,
    ) -> std::io::Result<()> {
        if refs.is_empty() {
            self.replace(values);
            return Ok(());
        }

        // resolve everything before touching the field table
        let mut slots = Vec::with_capacity(refs.len());
        for field in refs {
            let slot = match (field, fields.resolver(false).resolve(field)?) {
                (FieldRef::Name(name), Resolved::Unresolved) => Slot::New(name.to_string()),
                (FieldRef::Index(index), Resolved::Unresolved) =>
                    return throw(IndexOutOfRange(*index, fields.len())),
                // writes may extend the row up to the field count, never beyond
                (FieldRef::Index(index), Resolved::At(position)) if position >= fields.len() =>
                    return throw(IndexOutOfRange(*index, fields.len())),
                (_, resolved) => Slot::Known(resolved.positions()),
            };
            slots.push(slot);
        }
        let width = slots.iter().map(|slot| match slot {
            Slot::Known(positions) => positions.len(),
            Slot::New(..) => 1,
        }).sum::<usize>();
        if values.len() > width {
            return throw(ArityMismatch(values.len(), width));
        }

        let mut positions = Vec::with_capacity(width);
        for slot in slots {
            match slot {
                Slot::Known(known) => positions.extend(known),
                // the same new name may appear more than once
                Slot::New(name) => positions.push(match fields.position_of(&name) {
                    Some(position) => position,
                    None => fields.add_field(name),
                }),
            }
        }
        let mut values = values.into_iter();
        for position in positions {
            self.put(position, values.next().unwrap_or(Null));
        }
        Ok(())
    }

    /// Reads the referenced fields: no references yield an empty list, a single
    /// reference yields its value (or the values of its span), and multiple
    /// references yield all values with spans spliced in place.
    pub fn fetch(
        &self,
        resolver: &FieldResolver,
        refs: &[FieldRef],
    ) -> std::io::Result<Fetched> {
        match refs {
            [] => Ok(Fetched::Many(Vec::new())),
            [field] => Ok(match resolver.resolve(field)? {
                Resolved::Unresolved => Fetched::One(Null),
                Resolved::At(position) => Fetched::One(self.get(position)),
                Resolved::Span(positions) => Fetched::Many(self.get_all(&positions)),
            }),
            _ => {
                let mut values = Vec::new();
                for field in refs {
                    match resolver.resolve(field)? {
                        Resolved::Unresolved => values.push(Null),
                        Resolved::At(position) => values.push(self.get(position)),
                        Resolved::Span(positions) => values.extend(self.get_all(&positions)),
                    }
                }
                Ok(Fetched::Many(values))
            }
        }
    }

    /// Returns the cell at the given position; positions past the end read as Null
    pub fn get(&self, position: usize) -> CellValue {
        self.values.get(position).cloned().unwrap_or(Null)
    }

    pub fn get_all(&self, positions: &[usize]) -> Vec<CellValue> {
        positions.iter().map(|p| self.get(*p)).collect()
    }

    pub fn into_values(self) -> Vec<CellValue> { self.values }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn len(&self) -> usize { self.values.len() }

    /// Stores a cell, extending the row with Null cells as needed
    pub fn put(&mut self, position: usize, value: CellValue) {
        if position >= self.values.len() {
            self.values.resize(position + 1, Null);
        }
        self.values[position] = value;
    }

    pub fn replace(&mut self, values: Vec<CellValue>) {
        self.values = values;
    }

    pub fn values(&self) -> &[CellValue] { &self.values }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.values.iter()
            .map(|v| v.to_code())
            .collect::<Vec<_>>().join(", "))
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(values: Vec<CellValue>) -> Self { Row::new(values) }
}
