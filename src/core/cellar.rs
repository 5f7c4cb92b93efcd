////////////////////////////////////////////////////////////////////
// Cellar class
////////////////////////////////////////////////////////////////////

use std::collections::HashMap;

use log::debug;
use serde_json::{Map, Value};

use shared_lib::normalize_key;

use crate::cell_values::CellValue;
use crate::cell_values::CellValue::Null;
use crate::cellar_config::CellarConfig;
use crate::diagnostics::{log_sink, DiagnosticSink};
use crate::errors::throw;
use crate::errors::Errors::{NoIndexSpec, NoRowsDefined, ShapeMismatch};
use crate::field_refs::FieldRef;
use crate::field_resolver::{FieldResolver, Resolved};
use crate::field_table::FieldTable;
use crate::row_merger::RowMerger;
use crate::row_store::{Cursor, RowStore};
use crate::rows::{Fetched, Row};
use crate::secondary_index::{IndexSpec, SecondaryIndex};
use crate::table_renderer::{ShowMode, TableRenderer};

/// The literal forms a [Cellar] can be built from
#[derive(Clone, Debug, PartialEq)]
pub enum TableLiteral {
    /// a single sequence: the field names, or (without a header) the sole row
    Flat(Vec<CellValue>),
    /// a sequence of sequences: optionally a header followed by rows
    Nested(Vec<Vec<CellValue>>),
}

/// Anything that may be appended to, or merged into, a [Cellar]
#[derive(Clone, Debug)]
pub enum RowSource<'a> {
    Values(Vec<CellValue>),
    Table(Vec<Vec<CellValue>>),
    Record(&'a Cellar),
}

impl RowSource<'_> {
    fn describe(&self) -> String {
        match self {
            RowSource::Values(values) => format!("a list of {} values without fields", values.len()),
            RowSource::Table(rows) => format!("a nested table of {} rows", rows.len()),
            RowSource::Record(..) => "a record".into(),
        }
    }
}

impl From<Vec<CellValue>> for RowSource<'_> {
    fn from(values: Vec<CellValue>) -> Self { RowSource::Values(values) }
}

impl From<Row> for RowSource<'_> {
    fn from(row: Row) -> Self { RowSource::Values(row.into_values()) }
}

impl From<Vec<Vec<CellValue>>> for RowSource<'_> {
    fn from(rows: Vec<Vec<CellValue>>) -> Self { RowSource::Table(rows) }
}

impl<'a> From<&'a Cellar> for RowSource<'a> {
    fn from(cellar: &'a Cellar) -> Self { RowSource::Record(cellar) }
}

/// A row of named cells that doubles as a cursor over a collection of rows
/// sharing the same fields, with an optional secondary index.
#[derive(Clone, Debug)]
pub struct Cellar {
    fields: FieldTable,
    store: RowStore,
    index: SecondaryIndex,
    strict: bool,
}

impl Cellar {

    ////////////////////////////////////////////////////////////////////
    //      Constructors
    ////////////////////////////////////////////////////////////////////

    /// Creates an empty, lenient cellar
    pub fn new() -> Self {
        Self::from_parts(FieldTable::new(), false)
    }

    /// Creates a cellar with the given fields; strict if any were given
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item=S>,
        S: Into<String>,
    {
        let fields = FieldTable::with_fields(names);
        let strict = !fields.is_empty();
        Self::from_parts(fields, strict)
    }

    /// Builds a cellar from a table literal
    pub fn build(literal: TableLiteral, config: &CellarConfig) -> std::io::Result<Self> {
        Self::build_with_sink(literal, config, log_sink())
    }

    /// Builds a cellar from a table literal, reporting diagnostics to the given sink
    pub fn build_with_sink(
        literal: TableLiteral,
        config: &CellarConfig,
        sink: DiagnosticSink,
    ) -> std::io::Result<Self> {
        let mut fields = FieldTable::new()
            .with_sink(sink)
            .with_warnings(config.is_warning());
        let mut rows = None;
        match literal {
            TableLiteral::Nested(mut table) => {
                if config.has_header() && !table.is_empty() {
                    let header = table.remove(0);
                    fields.replace_all_fields(header.iter().map(|v| v.unwrap_value()));
                }
                if !table.is_empty() {
                    rows = Some(table.into_iter().map(Row::new).collect::<Vec<_>>());
                }
            }
            TableLiteral::Flat(values) if values.is_empty() => {}
            TableLiteral::Flat(values) if config.has_header() =>
                fields.replace_all_fields(values.iter().map(|v| v.unwrap_value())),
            TableLiteral::Flat(values) => rows = Some(vec![Row::new(values)]),
        }
        let strict = config.resolve_strict(!fields.is_empty());
        let mut cellar = Self::from_parts(fields, strict);
        if let Some(rows) = rows {
            cellar.store.assign_rows(rows);
        }
        if let Some(field) = config.get_index() {
            cellar.index_by(IndexSpec::field(field))?;
        }
        Ok(cellar)
    }

    fn from_parts(fields: FieldTable, strict: bool) -> Self {
        Self {
            fields,
            store: RowStore::new(),
            index: SecondaryIndex::new(),
            strict,
        }
    }

    /// Routes field-clash diagnostics to the given sink
    pub fn with_sink(mut self, sink: DiagnosticSink) -> Self {
        self.fields.set_sink(sink);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    ////////////////////////////////////////////////////////////////////
    //      Fields
    ////////////////////////////////////////////////////////////////////

    pub fn add_field(&mut self, name: impl Into<String>) -> usize {
        self.fields.add_field(name)
    }

    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.field(position)
    }

    pub fn field_table(&self) -> &FieldTable { &self.fields }

    pub fn fields(&self) -> &[String] { self.fields.fields() }

    pub fn is_strict(&self) -> bool { self.strict }

    pub fn rename_field(
        &mut self,
        field: impl Into<FieldRef>,
        new_name: impl Into<String>,
    ) -> std::io::Result<usize> {
        self.fields.rename_field(&field.into(), new_name)
    }

    /// Resolves a reference using this cellar's strictness
    pub fn resolve(&self, field: impl Into<FieldRef>) -> std::io::Result<Resolved> {
        self.resolver().resolve(&field.into())
    }

    /// Replaces every field; the only way fields are ever removed
    pub fn set_fields<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item=S>,
        S: Into<String>,
    {
        self.fields.replace_all_fields(names);
        self
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn widest(&self) -> usize { self.fields.widest() }

    fn resolver(&self) -> FieldResolver<'_> {
        self.fields.resolver(self.strict)
    }

    ////////////////////////////////////////////////////////////////////
    //      Values
    ////////////////////////////////////////////////////////////////////

    /// Reads a field by name (attribute-style); unknown names read as Null
    /// unless the cellar is strict.
    pub fn attr(&self, name: &str) -> std::io::Result<CellValue> {
        self.value(name)
    }

    /// Replaces the live buffer with an empty, detached one; stored rows are kept
    pub fn clear(&mut self) -> &mut Self {
        self.store.detach();
        self
    }

    /// Reads the referenced fields of the live row
    pub fn get(&self, refs: &[FieldRef]) -> std::io::Result<Fetched> {
        self.store.live().fetch(&self.resolver(), refs)
    }

    /// Assigns values to the referenced fields of the live row (see [Row::assign])
    pub fn set(&mut self, refs: &[FieldRef], values: Vec<CellValue>) -> std::io::Result<&[CellValue]> {
        self.store.live_mut().assign(&mut self.fields, refs, values)?;
        Ok(self.store.live().values())
    }

    /// Writes a field by name (attribute-style), adding the field if unknown
    pub fn set_attr(&mut self, name: &str, value: impl Into<CellValue>) -> std::io::Result<CellValue> {
        self.set_value(name, value)
    }

    pub fn set_value(
        &mut self,
        field: impl Into<FieldRef>,
        value: impl Into<CellValue>,
    ) -> std::io::Result<CellValue> {
        let value = value.into();
        self.set(&[field.into()], vec![value.clone()])?;
        Ok(value)
    }

    /// Replaces the live buffer wholesale with a detached one; stored rows are kept.
    /// Use `set(&[], values)` to overwrite the selected row instead.
    pub fn set_values(&mut self, values: Vec<CellValue>) -> &mut Self {
        self.store.detach_with(Row::new(values));
        self
    }

    /// Reads a single field of the live row
    pub fn value(&self, field: impl Into<FieldRef>) -> std::io::Result<CellValue> {
        Ok(match self.resolver().position(&field.into())? {
            Some(position) => self.store.live().get(position),
            None => Null,
        })
    }

    pub fn values(&self) -> &[CellValue] {
        self.store.live().values()
    }

    ////////////////////////////////////////////////////////////////////
    //      Rows
    ////////////////////////////////////////////////////////////////////

    /// Appends a row, moves the cursor onto it and indexes it. A record source is
    /// aligned by field name. If indexing fails the append is undone entirely.
    pub fn append<'a>(&mut self, source: impl Into<RowSource<'a>>) -> std::io::Result<&mut Self> {
        let bookmark = self.store.bookmark();
        let field_count = self.fields.len();
        let outcome = match source.into() {
            RowSource::Values(values) => {
                let position = self.store.append(Row::new(values));
                self.index_row(position)
            }
            RowSource::Record(other) => {
                let position = self.store.append(Row::empty());
                let refs = other.fields().iter().map(FieldRef::from).collect::<Vec<_>>();
                let assigned = self.set(&refs, other.values().to_vec()).map(|_| ());
                assigned.and_then(|_| self.index_row(position))
            }
            source => return throw(ShapeMismatch(source.describe()))
        };
        if let Err(err) = outcome {
            self.store.pop();
            self.store.restore(bookmark);
            self.fields.truncate(field_count);
            return Err(err);
        }
        Ok(self)
    }

    /// Replaces the row collection and selects its first row. The secondary
    /// index is not maintained here; see [Cellar::rebuild_index].
    pub fn assign_rows(&mut self, rows: Vec<Vec<CellValue>>) -> &mut Self {
        self.store.assign_rows(rows.into_iter().map(Row::new).collect());
        self
    }

    pub fn cursor(&self) -> Cursor { self.store.cursor() }

    /// Selects no row; the live buffer becomes empty
    pub fn detach(&mut self) -> &mut Self {
        self.store.detach();
        self
    }

    /// Visits every row in order, selecting each before handing over the cellar
    pub fn each<F>(&mut self, mut f: F) -> std::io::Result<()>
    where
        F: FnMut(&mut Self) -> std::io::Result<()>,
    {
        if !self.store.is_defined() { return throw(NoRowsDefined); }
        for position in 0..self.store.len() {
            self.store.select(position)?;
            f(self)?;
        }
        Ok(())
    }

    /// Like [Cellar::each], collecting the results
    pub fn map<A, F>(&mut self, mut f: F) -> std::io::Result<Vec<A>>
    where
        F: FnMut(&mut Self) -> A,
    {
        if !self.store.is_defined() { return throw(NoRowsDefined); }
        let mut results = Vec::with_capacity(self.store.len());
        for position in 0..self.store.len() {
            self.store.select(position)?;
            results.push(f(self));
        }
        Ok(results)
    }

    pub fn position(&self) -> Option<usize> { self.store.position() }

    pub fn row_count(&self) -> usize { self.store.len() }

    pub fn rows(&self) -> Option<&[Row]> { self.store.rows() }

    pub fn select_first(&mut self) -> std::io::Result<&mut Self> {
        self.store.select_first()?;
        Ok(self)
    }

    pub fn select_row(&mut self, position: usize) -> std::io::Result<&mut Self> {
        self.store.select(position)?;
        Ok(self)
    }

    ////////////////////////////////////////////////////////////////////
    //      Secondary Index
    ////////////////////////////////////////////////////////////////////

    /// Installs the index specification and indexes every row
    pub fn index_by(&mut self, spec: IndexSpec) -> std::io::Result<usize> {
        self.index.set_spec(spec)?;
        self.rebuild_index()
    }

    /// Returns the number of indexed rows
    pub fn index_len(&self) -> usize { self.index.len() }

    /// Clears and rescans the index; the cursor is left where it was
    pub fn rebuild_index(&mut self) -> std::io::Result<usize> {
        let spec = match self.index.spec() {
            Some(spec) => spec.clone(),
            None => return throw(NoIndexSpec),
        };
        self.store.ensure_defined();
        let bookmark = self.store.bookmark();
        let mut index = std::mem::take(&mut self.index);
        let outcome = index.rebuild(self.store.len(), |position| {
            self.store.select(position)?;
            self.derive_key(&spec)
        });
        self.index = index;
        self.store.restore(bookmark);
        outcome
    }

    /// Positions the cursor on the row owning the key. If there is no such
    /// row (or no index at all) the cursor is detached and false is returned.
    pub fn seek(&mut self, key: impl Into<CellValue>) -> bool {
        let key = key.into();
        let found = match self.index.lookup(&key) {
            Some(position) => self.store.select(position).is_ok(),
            None => false,
        };
        if !found { self.store.detach() }
        debug!("seek {} => {:?}", key.to_code(), self.store.cursor());
        found
    }

    fn derive_key(&self, spec: &IndexSpec) -> std::io::Result<CellValue> {
        match spec {
            IndexSpec::Field(field) =>
                Ok(match self.fields.resolver(true).position(field)? {
                    Some(position) => self.store.live().get(position),
                    None => Null,
                }),
            IndexSpec::Derived(key_of) => key_of(self),
        }
    }

    fn index_row(&mut self, position: usize) -> std::io::Result<()> {
        let spec = match self.index.spec() {
            Some(spec) => spec.clone(),
            None => return Ok(()),
        };
        let key = self.derive_key(&spec)?;
        self.index.insert(key, position)?;
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////
    //      Merging
    ////////////////////////////////////////////////////////////////////

    /// Folds the non-blank values of another record into the live row;
    /// incoming values overwrite.
    pub fn merge<'a>(&mut self, source: impl Into<RowSource<'a>>) -> std::io::Result<&mut Self> {
        self.merge_using(source.into(), RowMerger::new())
    }

    /// Like [Cellar::merge], but cells holding a value on both sides are decided
    /// by `on_conflict(existing, incoming)`; a blank decision keeps the existing value.
    pub fn merge_with<'a, F>(
        &mut self,
        source: impl Into<RowSource<'a>>,
        on_conflict: F,
    ) -> std::io::Result<&mut Self>
    where
        F: Fn(&CellValue, &CellValue) -> CellValue,
    {
        self.merge_using(source.into(), RowMerger::with_resolver(&on_conflict))
    }

    fn merge_using(&mut self, source: RowSource, merger: RowMerger) -> std::io::Result<&mut Self> {
        match source {
            RowSource::Record(other) => {
                merger.merge(&mut self.fields, self.store.live_mut(), &other.fields, other.store.live())?;
                Ok(self)
            }
            source => throw(ShapeMismatch(source.describe()))
        }
    }

    ////////////////////////////////////////////////////////////////////
    //      Conversions
    ////////////////////////////////////////////////////////////////////

    /// Returns the field names followed by every row (or just the live row
    /// when there is no row collection), each aligned to the field count.
    pub fn cells(&self) -> Vec<Vec<CellValue>> {
        let width = self.fields.len();
        let mut cells = vec![self.fields.fields().iter().map(CellValue::from).collect::<Vec<_>>()];
        match self.store.rows() {
            Some(rows) => cells.extend(rows.iter().map(|row| row.aligned(width))),
            None => cells.push(self.store.live().aligned(width)),
        }
        cells
    }

    /// Replaces the live buffer with the given values, trimming string cells
    pub fn from_array(&mut self, values: Vec<CellValue>) -> &mut Self {
        self.set_values(values.iter().map(|v| v.trimmed()).collect())
    }

    /// Empties the live buffer, then assigns every non-blank value by name
    pub fn from_hash<I, K, V>(&mut self, pairs: I) -> std::io::Result<&mut Self>
    where
        I: IntoIterator<Item=(K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        self.clear();
        for (name, value) in pairs {
            let value = value.into();
            if value.is_present() {
                self.set(&[FieldRef::Name(name.into())], vec![value])?;
            }
        }
        Ok(self)
    }

    /// Renders the fields and rows as text
    pub fn show(&self, mode: ShowMode) -> Vec<String> {
        TableRenderer::render(&self.cells(), mode)
    }

    /// Returns the non-blank values of the live row keyed by normalized field name
    pub fn to_hash(&self) -> HashMap<String, CellValue> {
        let live = self.store.live();
        self.fields.fields().iter().enumerate()
            .filter_map(|(position, name)| {
                let value = live.get(position);
                if value.is_present() { Some((normalize_key(name), value)) } else { None }
            })
            .collect()
    }

    /// Returns [Cellar::to_hash] as a JSON object
    pub fn to_json(&self) -> Value {
        let map = self.to_hash().into_iter()
            .map(|(name, value)| (name, value.to_json()))
            .collect::<Map<String, Value>>();
        Value::Object(map)
    }
}

impl Default for Cellar {
    fn default() -> Self { Self::new() }
}
