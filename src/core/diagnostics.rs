////////////////////////////////////////////////////////////////////
// diagnostics module
////////////////////////////////////////////////////////////////////

use std::fmt::Display;
use std::rc::Rc;

use log::warn;
use serde::{Deserialize, Serialize};

/// Non-fatal conditions reported on the side while fields are managed
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// a field whose normalized key is already claimed by an earlier field
    FieldClash { field: String, key: String, position: usize },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::FieldClash { field, key, position } =>
                write!(f, "field clash for {field:?} (key {key:?} already maps to position {position})"),
        }
    }
}

/// Receives diagnostics; shared by clones of the same field table
pub type DiagnosticSink = Rc<dyn Fn(&Diagnostic)>;

/// The default sink: forwards every diagnostic to the log
pub fn log_sink() -> DiagnosticSink {
    Rc::new(|diagnostic: &Diagnostic| warn!("{}", diagnostic))
}
