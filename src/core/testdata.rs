////////////////////////////////////////////////////////////////////
// test data module
////////////////////////////////////////////////////////////////////

use crate::cellar::{Cellar, TableLiteral};
use crate::cellar_config::CellarConfig;
use crate::cells;

pub fn make_people() -> Cellar {
    make_table(vec![
        cells!["Name", "Age", "City"],
        cells!["Ada", 36, "London"],
        cells!["Bob", 41, "Oslo"],
        cells!["Cy", 28, "Lima"],
    ])
}

pub fn make_quotes() -> Cellar {
    make_table(vec![
        cells!["symbol", "exchange", "last_sale"],
        cells!["ABC", "AMEX", 11.77],
        cells!["UNO", "NASDAQ", 0.2456],
        cells!["BIZ", "NYSE", 23.66],
        cells!["GOTO", "OTC", 0.1428],
        cells!["BOOM", "NASDAQ", 56.87],
    ])
}

fn make_table(table: Vec<Vec<crate::cell_values::CellValue>>) -> Cellar {
    match Cellar::build(TableLiteral::Nested(table), &CellarConfig::new()) {
        Ok(cellar) => cellar,
        Err(err) => panic!("{}", err),
    }
}
