//! Slot code parsing and validity filtering.

pub mod parser;

pub use parser::{parse, LocationParser};
