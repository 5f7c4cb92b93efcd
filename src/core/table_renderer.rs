////////////////////////////////////////////////////////////////////
// table renderer module
////////////////////////////////////////////////////////////////////

use itertools::Itertools;

use shared_lib::display_width;

use crate::cell_values::CellValue;

/// Selects the textual layout produced by [TableRenderer]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ShowMode {
    #[default]
    Table,
    Tabs,
}

/// Table renderer
pub struct TableRenderer;

impl TableRenderer {
    /// Transforms a header row followed by body rows into lines of text
    pub fn render(cells: &[Vec<CellValue>], mode: ShowMode) -> Vec<String> {
        let text = cells.iter()
            .map(|row| row.iter().map(|v| v.unwrap_value()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        match mode {
            ShowMode::Table => Self::tabulate(&text),
            ShowMode::Tabs => text.iter().map(|row| row.iter().join("\t")).collect(),
        }
    }

    fn tabulate(text: &[Vec<String>]) -> Vec<String> {
        let widths = Self::column_widths(text);
        let rule = format!("•{}•", widths.iter().map(|w| "─".repeat(w + 2)).join("•"));
        let mut lines = vec![String::new(), rule.to_string()];
        let mut rows = text.iter();
        if let Some(header) = rows.next() {
            lines.push(Self::tabulate_row(header, &widths));
            lines.push(rule.to_string());
        }
        let mut seen = 0;
        for row in rows {
            lines.push(Self::tabulate_row(row, &widths));
            seen += 1;
        }
        lines.push(rule);
        lines.push(format!("{seen} row{} displayed", if seen == 1 { "" } else { "s" }));
        lines.push(String::new());
        lines
    }

    fn tabulate_row(row: &[String], widths: &[usize]) -> String {
        let cells = widths.iter().enumerate()
            .map(|(n, width)| {
                let text = row.get(n).map(|s| s.as_str()).unwrap_or("");
                let pad = width.saturating_sub(display_width(text));
                format!("{text}{}", " ".repeat(pad))
            })
            .join(" │ ");
        format!("│ {cells} │")
    }

    fn column_widths(text: &[Vec<String>]) -> Vec<usize> {
        let columns = text.iter().map(|row| row.len()).max().unwrap_or(0);
        (0..columns)
            .map(|n| text.iter()
                .filter_map(|row| row.get(n))
                .map(|s| display_width(s))
                .max()
                .unwrap_or(0))
            .collect()
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::cells;

    use super::*;

    #[test]
    fn test_render_table() {
        let lines = TableRenderer::render(&[
            cells!["symbol", "exchange", "last_sale"],
            cells!["ABC", "AMEX", 11.77],
            cells!["UNO", "NASDAQ", 0.2456],
            cells!["BIZ", "NYSE", None::<f64>],
        ], ShowMode::Table);
        for line in &lines { println!("{}", line) }
        assert_eq!(lines, vec![
            "",
            "•────────•──────────•───────────•",
            "│ symbol │ exchange │ last_sale │",
            "•────────•──────────•───────────•",
            "│ ABC    │ AMEX     │ 11.77     │",
            "│ UNO    │ NASDAQ   │ 0.2456    │",
            "│ BIZ    │ NYSE     │           │",
            "•────────•──────────•───────────•",
            "3 rows displayed",
            "",
        ])
    }

    #[test]
    fn test_render_single_row() {
        let lines = TableRenderer::render(&[cells!["Name"], cells!["Zoë"]], ShowMode::Table);
        assert_eq!(lines, vec![
            "",
            "•──────•",
            "│ Name │",
            "•──────•",
            "│ Zoë  │",
            "•──────•",
            "1 row displayed",
            "",
        ])
    }

    #[test]
    fn test_render_header_only() {
        let lines = TableRenderer::render(&[cells!["a", "b"]], ShowMode::Table);
        assert_eq!(lines[lines.len() - 2], "0 rows displayed");
    }

    #[test]
    fn test_render_tabs() {
        let lines = TableRenderer::render(&[
            cells!["symbol", "exchange"],
            cells!["ABC", "AMEX"],
            cells!["UNO", None::<&str>],
        ], ShowMode::Tabs);
        assert_eq!(lines, vec!["symbol\texchange", "ABC\tAMEX", "UNO\t"])
    }
}
