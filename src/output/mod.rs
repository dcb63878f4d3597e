//! Presentation of a traced message: terminal report and JSON.

pub mod json;
pub mod report;
pub mod style;
