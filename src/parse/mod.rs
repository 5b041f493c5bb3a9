//! Parsing module for interval literals
//!
//! This module reads the textual literal syntax into formatting nodes and
//! evaluates those nodes into intervals and vals.

pub mod grammar;
pub mod tokens;
pub mod value;

// Re-export commonly used types
pub use grammar::{parse_literal, ParsedLiteral, Unit};
pub use tokens::Scanner;
pub use value::{from_notation, literal_value, Notated};
