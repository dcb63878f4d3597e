//! `qidtrace` — follow one message through a mail-gateway log by queue id.
//!
//! This crate provides the core library for locating the right log file,
//! collecting the lines that belong to a QID and extracting a structured
//! [`model::record::MessageRecord`] from them.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod output;
pub mod parser;
pub mod source;
