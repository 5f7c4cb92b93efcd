////////////////////////////////////////////////////////////////////
// row merger module
////////////////////////////////////////////////////////////////////

use crate::cell_values::CellValue;
use crate::errors::throw;
use crate::errors::Errors::ShapeMismatch;
use crate::field_table::FieldTable;
use crate::rows::Row;

/// Decides the value of a cell present on both sides: (existing, incoming) => result.
/// A blank result keeps the existing value.
pub type ConflictFn<'a> = &'a dyn Fn(&CellValue, &CellValue) -> CellValue;

/// Folds the non-blank cells of a source row into a target row, matching
/// fields by name and adding the fields the target lacks.
#[derive(Clone, Copy, Default)]
pub struct RowMerger<'a> {
    on_conflict: Option<ConflictFn<'a>>,
}

impl<'a> RowMerger<'a> {
    /// Incoming values always overwrite
    pub fn new() -> Self {
        Self { on_conflict: None }
    }

    pub fn with_resolver(on_conflict: ConflictFn<'a>) -> Self {
        Self { on_conflict: Some(on_conflict) }
    }

    /// Merges `source` into `target`, returning the number of cells written
    pub fn merge(
        &self,
        target_fields: &mut FieldTable,
        target: &mut Row,
        source_fields: &FieldTable,
        source: &Row,
    ) -> std::io::Result<usize> {
        // a value without a field name fails before anything is written
        let named = source_fields.len();
        if let Some(position) = source.values().iter().rposition(|v| v.is_present()) {
            if position >= named {
                return throw(ShapeMismatch(
                    format!("a row with a value at position {position} but only {named} fields")));
            }
        }
        let mut written = 0;
        for (name, incoming) in source_fields.fields().iter().zip(source.values()) {
            if incoming.is_blank() { continue; }
            let target_position = match target_fields.position_of(name) {
                Some(p) => p,
                None => target_fields.add_field(name),
            };
            let existing = target.get(target_position);
            let value = match self.on_conflict {
                Some(on_conflict) if existing.is_present() => {
                    let chosen = on_conflict(&existing, incoming);
                    if chosen.is_blank() { continue; }
                    chosen
                }
                _ => incoming.clone()
            };
            target.put(target_position, value);
            written += 1;
        }
        Ok(written)
    }
}
