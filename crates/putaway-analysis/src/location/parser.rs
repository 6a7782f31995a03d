//! Positional slot code decoder and structural validity predicate.
//!
//! Layout: first char = zone, second = aisle, last = row, everything in
//! between = column. `TN52D` → zone `T`, aisle `N`, column `52`, row `D`.

use putaway_core::constants::DEFAULT_VIRTUAL_PREFIXES;
use putaway_core::types::LocationCode;

/// Decode a slot code. Never fails on malformed input: an empty code yields
/// `None`, and codes shorter than four chars yield an empty column (and, below
/// three chars, empty trailing fields).
pub fn parse(code: &str) -> Option<LocationCode> {
    let chars: Vec<char> = code.chars().collect();
    let len = chars.len();
    if len == 0 {
        return None;
    }

    let field = |i: usize| chars.get(i).map(|c| c.to_string()).unwrap_or_default();
    let row = if len >= 3 { field(len - 1) } else { String::new() };
    let column = if len >= 4 {
        chars[2..len - 1].iter().collect()
    } else {
        String::new()
    };

    Some(LocationCode {
        zone: field(0),
        aisle: field(1),
        column,
        row,
    })
}

/// Validity predicate configured with the warehouse's virtual-area prefixes.
#[derive(Debug, Clone)]
pub struct LocationParser {
    virtual_prefixes: Vec<String>,
}

impl LocationParser {
    pub fn new<I, S>(virtual_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            virtual_prefixes: virtual_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(&self, code: &str) -> Option<LocationCode> {
        parse(code)
    }

    /// Whether `code` may be offered as a putaway candidate.
    ///
    /// False for missing/empty codes, virtual areas (floor, receiving,
    /// order staging), and subdivided slots ending in a doubled letter
    /// such as `A02AA`.
    pub fn is_valid(&self, code: Option<&str>) -> bool {
        let Some(code) = code else {
            return false;
        };
        if code.is_empty() {
            return false;
        }
        if self.virtual_prefixes.iter().any(|p| code.starts_with(p.as_str())) {
            return false;
        }
        !ends_in_double_letter(code)
    }

    pub fn virtual_prefixes(&self) -> &[String] {
        &self.virtual_prefixes
    }
}

impl Default for LocationParser {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_PREFIXES.iter().copied())
    }
}

fn ends_in_double_letter(code: &str) -> bool {
    let mut tail = code.chars().rev();
    match (tail.next(), tail.next()) {
        (Some(last), Some(prev)) => last.is_alphabetic() && prev.is_alphabetic() && last == prev,
        _ => false,
    }
}
