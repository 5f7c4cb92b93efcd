////////////////////////////////////////////////////////////////////
// FieldTable class
////////////////////////////////////////////////////////////////////

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use log::debug;

use shared_lib::{display_width, normalize_key};

use crate::diagnostics::{log_sink, Diagnostic, DiagnosticSink};
use crate::errors::throw;
use crate::errors::Errors::UnknownField;
use crate::field_refs::FieldRef;
use crate::field_resolver::FieldResolver;

/// The ordered field names of a row (or of every row of a collection)
/// together with the name-to-position lookup.
#[derive(Clone)]
pub struct FieldTable {
    fields: Vec<String>,
    lookup: HashMap<String, usize>,
    widest: usize,
    warn: bool,
    sink: DiagnosticSink,
}

impl FieldTable {

    ////////////////////////////////////////////////////////////////////
    //      Constructors
    ////////////////////////////////////////////////////////////////////

    /// Creates an empty field table
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            lookup: HashMap::new(),
            widest: 0,
            warn: true,
            sink: log_sink(),
        }
    }

    /// Creates a field table seeded with the given names
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item=S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        table.replace_all_fields(names);
        table
    }

    /// Routes field-clash diagnostics to the given sink
    pub fn with_sink(mut self, sink: DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Enables or silences field-clash diagnostics
    pub fn with_warnings(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    ////////////////////////////////////////////////////////////////////
    //      Instance Methods
    ////////////////////////////////////////////////////////////////////

    /// Appends a field, returning its position. A field whose normalized key
    /// is already taken is still added, but only reachable by its exact name
    /// (if that is free) or its position.
    pub fn add_field(&mut self, name: impl Into<String>) -> usize {
        let field: String = name.into();
        let position = self.fields.len();
        let key = normalize_key(&field);
        match self.lookup.get(&key) {
            Some(&existing) => self.report(Diagnostic::FieldClash {
                field: field.to_string(),
                key,
                position: existing,
            }),
            None => { self.lookup.insert(key, position); }
        }
        self.lookup.entry(field.to_string()).or_insert(position);
        self.widest = self.widest.max(display_width(&field));
        self.fields.push(field);
        position
    }

    /// Returns the name of the field at the given position
    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(|s| s.as_str())
    }

    pub fn fields(&self) -> &[String] { &self.fields }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn len(&self) -> usize { self.fields.len() }

    /// Looks up a name exactly, then by its normalized key
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name)
            .or_else(|| self.lookup.get(&normalize_key(name)))
            .copied()
    }

    /// Renames the referenced field in place; positions never change
    pub fn rename_field(
        &mut self,
        field: &FieldRef,
        new_name: impl Into<String>,
    ) -> std::io::Result<usize> {
        // anything that does not name an existing field is unknown
        let position = match self.resolver(false).position(field)? {
            Some(position) if position < self.fields.len() => position,
            _ => return throw(UnknownField(match field {
                FieldRef::Name(name) => name.to_string(),
                other => other.to_string(),
            }))
        };
        let old_name = std::mem::replace(&mut self.fields[position], new_name.into());
        for key in [normalize_key(&old_name), old_name.to_string()] {
            if self.lookup.get(&key) == Some(&position) {
                self.lookup.remove(&key);
            }
        }
        let new_name = self.fields[position].to_string();
        let key = normalize_key(&new_name);
        match self.lookup.get(&key) {
            Some(&existing) if existing != position => self.report(Diagnostic::FieldClash {
                field: new_name.to_string(),
                key,
                position: existing,
            }),
            Some(..) => {}
            None => { self.lookup.insert(key, position); }
        }
        self.lookup.entry(new_name.to_string()).or_insert(position);
        self.widest = self.fields.iter().map(|f| display_width(f)).max().unwrap_or(0);
        debug!("renamed field {old_name:?} to {new_name:?} at position {position}");
        Ok(position)
    }

    /// Clears all fields, then adds the given names in order
    pub fn replace_all_fields<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item=S>,
        S: Into<String>,
    {
        self.fields.clear();
        self.lookup.clear();
        self.widest = 0;
        for name in names {
            self.add_field(name);
        }
    }

    /// Returns a resolver over this table
    pub fn resolver(&self, strict: bool) -> FieldResolver<'_> {
        FieldResolver::new(self, strict)
    }

    pub fn set_sink(&mut self, sink: DiagnosticSink) {
        self.sink = sink;
    }

    pub fn set_warnings(&mut self, warn: bool) {
        self.warn = warn;
    }

    /// Drops every field at or beyond the given length, along with its lookup entries
    pub(crate) fn truncate(&mut self, len: usize) {
        if len >= self.fields.len() { return; }
        self.fields.truncate(len);
        self.lookup.retain(|_, position| *position < len);
        self.widest = self.fields.iter().map(|f| display_width(f)).max().unwrap_or(0);
    }

    /// Returns the display width of the longest field name
    pub fn widest(&self) -> usize { self.widest }

    fn report(&self, diagnostic: Diagnostic) {
        if self.warn { (self.sink)(&diagnostic) }
    }
}

impl Debug for FieldTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldTable")
            .field("fields", &self.fields)
            .field("widest", &self.widest)
            .field("warn", &self.warn)
            .finish()
    }
}

impl Default for FieldTable {
    fn default() -> Self { Self::new() }
}

impl PartialEq for FieldTable {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields && self.lookup == other.lookup
    }
}
