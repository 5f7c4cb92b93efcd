////////////////////////////////////////////////////////////////////
// shared libraries
////////////////////////////////////////////////////////////////////

use once_cell::sync::Lazy;
use regex::Regex;

#[macro_export]
macro_rules! cnv_error {
    ($e:expr) => {
        std::io::Error::new(std::io::ErrorKind::Other, $e)
    }
}

static NON_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_]").expect("static pattern")
});

pub fn fail<A>(message: impl Into<String>) -> std::io::Result<A> {
    Err(std::io::Error::new(std::io::ErrorKind::Other, message.into()))
}

/// Returns true if the text is empty or consists only of whitespace
pub fn is_blank_text(text: &str) -> bool {
    text.trim().is_empty()
}

/// Produces the forgiving lookup key of a field name: lower-cased,
/// with every non-word character replaced by an underscore.
/// ex: "First Name" => "first_name"
pub fn normalize_key(name: &str) -> String {
    NON_WORD.replace_all(&name.to_lowercase(), "_").into_owned()
}

/// Picks the cell delimiter of a delimited text file based on its extension,
/// falling back to sniffing the header line.
pub fn detect_delimiter(path: &str, header_line: &str) -> char {
    let lower = path.to_lowercase();
    if lower.ends_with(".csv") { ',' }
    else if lower.ends_with(".tsv") || lower.ends_with(".tab") { '\t' }
    else if lower.ends_with(".psv") { '|' }
    else {
        ['\t', '|', ',']
            .into_iter()
            .max_by_key(|c| header_line.matches(*c).count())
            .unwrap_or('\t')
    }
}

/// Returns the number of characters needed to display the text
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}
