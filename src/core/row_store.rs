////////////////////////////////////////////////////////////////////
// row store module
////////////////////////////////////////////////////////////////////

use log::debug;

use crate::errors::throw;
use crate::errors::Errors::{IndexOutOfRange, NoRowsDefined};
use crate::rows::Row;

static EMPTY_ROW: Row = Row::empty();

/// Indicates which row, if any, backs the live buffer
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cursor {
    Detached,
    Attached(usize),
}

/// A saved cursor state that can be restored after a failed operation
#[derive(Clone, Debug, PartialEq)]
pub struct Bookmark {
    position: Option<usize>,
    detached: Row,
}

/// Represents an ordered collection of rows plus the cursor selecting which
/// row is live. While detached, the live buffer is an independent row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowStore {
    rows: Option<Vec<Row>>,
    position: Option<usize>,
    detached: Row,
}

impl RowStore {

    ////////////////////////////////////////////////////////////////
    //  Constructors
    ////////////////////////////////////////////////////////////////

    /// Creates a store without any row collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given rows, with the first row selected
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let mut store = Self::new();
        store.assign_rows(rows);
        store
    }

    ////////////////////////////////////////////////////////////////
    //  Functions and Methods
    ////////////////////////////////////////////////////////////////

    /// Appends a row and moves the cursor onto it, returning its position
    pub fn append(&mut self, row: Row) -> usize {
        let rows = self.rows.get_or_insert_with(Vec::new);
        rows.push(row);
        let position = rows.len() - 1;
        self.attach(position);
        position
    }

    /// Replaces the entire row collection, then selects the first row (if any)
    pub fn assign_rows(&mut self, rows: Vec<Row>) {
        debug!("assigning {} row(s)", rows.len());
        let is_empty = rows.is_empty();
        self.rows = Some(rows);
        if is_empty { self.detach() } else { self.attach(0) }
    }

    pub fn bookmark(&self) -> Bookmark {
        Bookmark { position: self.position, detached: self.detached.clone() }
    }

    pub fn cursor(&self) -> Cursor {
        match self.position() {
            Some(position) => Cursor::Attached(position),
            None => Cursor::Detached,
        }
    }

    /// Selects no row: the live buffer becomes an empty, independent row
    pub fn detach(&mut self) {
        self.position = None;
        self.detached = Row::empty();
    }

    /// Creates the (empty) row collection if there is none yet
    pub fn ensure_defined(&mut self) {
        self.rows.get_or_insert_with(Vec::new);
    }

    /// Returns true once a row collection exists (even an empty one)
    pub fn is_defined(&self) -> bool { self.rows.is_some() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn len(&self) -> usize {
        self.rows.as_ref().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Returns the row currently backing the live buffer
    pub fn live(&self) -> &Row {
        match self.position() {
            Some(position) => self.row(position).unwrap_or(&EMPTY_ROW),
            None => &self.detached,
        }
    }

    pub fn live_mut(&mut self) -> &mut Row {
        if let Some(position) = self.position() {
            if let Some(rows) = self.rows.as_mut() {
                return &mut rows[position];
            }
        }
        &mut self.detached
    }

    /// Returns the position of the selected row
    pub fn position(&self) -> Option<usize> {
        self.position.filter(|p| *p < self.len())
    }

    /// Removes the last row without touching the cursor
    pub(crate) fn pop(&mut self) -> Option<Row> {
        self.rows.as_mut().and_then(|rows| rows.pop())
    }

    pub fn restore(&mut self, bookmark: Bookmark) {
        self.position = bookmark.position;
        self.detached = bookmark.detached;
        if self.position.is_some() && self.position().is_none() {
            self.detach()
        }
    }

    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.as_ref().and_then(|rows| rows.get(position))
    }

    pub fn rows(&self) -> Option<&[Row]> {
        self.rows.as_deref()
    }

    /// Attaches the cursor to the row at the given position
    pub fn select(&mut self, position: usize) -> std::io::Result<&Row> {
        match self.len() {
            0 => throw(NoRowsDefined),
            count if position >= count => throw(IndexOutOfRange(position as i64, count)),
            _ => {
                self.attach(position);
                Ok(self.live())
            }
        }
    }

    pub fn select_first(&mut self) -> std::io::Result<&Row> {
        self.select(0)
    }

    /// Detaches the cursor and installs the row as the independent live buffer;
    /// stored rows are left as they are
    pub fn detach_with(&mut self, row: Row) {
        self.position = None;
        self.detached = row;
    }

    fn attach(&mut self, position: usize) {
        self.position = Some(position);
        self.detached = Row::empty();
    }
}
