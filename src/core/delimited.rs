////////////////////////////////////////////////////////////////////
// delimited text module
////////////////////////////////////////////////////////////////////

use std::fs;

use log::info;

use shared_lib::detect_delimiter;

use crate::cell_values::CellValue;
use crate::cell_values::CellValue::{Null, StringValue};
use crate::cellar::{Cellar, TableLiteral};
use crate::cellar_config::CellarConfig;

/// Reads tab-, comma- or pipe-delimited text into table literals.
/// Cells are trimmed; empty cells become Null. Blank lines are skipped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DelimitedReader {
    delimiter: char,
}

impl DelimitedReader {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Loads a delimited file into a [Cellar]; the first line holds the field names
    pub fn read_file(path: &str, config: &CellarConfig) -> std::io::Result<Cellar> {
        let text = fs::read_to_string(path)?;
        let header_line = text.lines().next().unwrap_or("");
        let reader = Self::new(detect_delimiter(path, header_line));
        let literal = reader.parse(&text);
        if let TableLiteral::Nested(rows) = &literal {
            info!("read {} line(s) from {path} using {:?}", rows.len(), reader.delimiter);
        }
        Cellar::build(literal, config)
    }

    pub fn delimiter(&self) -> char { self.delimiter }

    /// Splits the text into rows of cells
    pub fn parse(&self, text: &str) -> TableLiteral {
        TableLiteral::Nested(text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_line(line))
            .collect())
    }

    pub fn parse_line(&self, line: &str) -> Vec<CellValue> {
        line.split(self.delimiter)
            .map(|cell| match cell.trim() {
                "" => Null,
                text => StringValue(text.to_string()),
            })
            .collect()
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::cells;

    use super::*;

    #[test]
    fn test_parse_line() {
        let reader = DelimitedReader::new('|');
        assert_eq!(reader.parse_line(" ABC | AMEX |  | 11.77"),
                   vec![StringValue("ABC".into()), StringValue("AMEX".into()), Null, StringValue("11.77".into())]);
    }

    #[test]
    fn test_parse() {
        let reader = DelimitedReader::new(',');
        assert_eq!(reader.parse("id,name\n\n1,Ada\n2,Bob\n"), TableLiteral::Nested(vec![
            cells!["id", "name"], cells!["1", "Ada"], cells!["2", "Bob"],
        ]));
    }

    #[test]
    fn test_read_file() {
        let path = std::env::temp_dir().join("cellar_delimited_test.tsv");
        fs::write(&path, "symbol\texchange\nABC\tAMEX\nUNO\tNASDAQ\n").unwrap();
        let mut c = DelimitedReader::read_file(path.to_str().unwrap(),
                                               &CellarConfig::new().with_index("symbol")).unwrap();
        assert_eq!(c.fields(), &["symbol".to_string(), "exchange".to_string()]);
        assert_eq!(c.row_count(), 2);
        assert!(c.seek("UNO"));
        assert_eq!(c.attr("exchange").unwrap(), StringValue("NASDAQ".into()));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(DelimitedReader::read_file("/no/such/cellar.csv", &CellarConfig::new()).is_err());
    }
}
