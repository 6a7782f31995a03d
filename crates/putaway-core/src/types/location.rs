//! Structural fields of a slot code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A decoded slot code: `zone` `aisle` `column` `row`, e.g. `TN52D`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationCode {
    pub zone: String,
    pub aisle: String,
    /// One or two characters; empty for codes shorter than four characters.
    pub column: String,
    pub row: String,
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.zone, self.aisle, self.column, self.row)
    }
}
