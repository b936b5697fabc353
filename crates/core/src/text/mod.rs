//! Input records, character classes and tokenization.

pub mod marks;
pub mod reader;
pub mod tokenize;

pub use reader::{parse_units, read_units};
pub use tokenize::tokenize;
