////////////////////////////////////////////////////////////////////
//      Cellar v0.2.2
////////////////////////////////////////////////////////////////////

pub mod cell_values;
pub mod cellar;
pub mod cellar_config;
pub mod delimited;
pub mod diagnostics;
pub mod errors;
pub mod field_refs;
pub mod field_resolver;
pub mod field_table;
pub mod row_merger;
pub mod row_store;
pub mod rows;
pub mod secondary_index;
pub mod table_renderer;

#[cfg(test)]
mod testdata;
