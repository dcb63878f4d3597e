//! Log parsing: the QID line filter and the field extractor.

pub mod extract;
pub mod filter;
