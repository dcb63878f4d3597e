//! Line filter: collects every log line that mentions a QID.
//!
//! Matching lines are joined into a single "blob" with the two-character
//! token `\n` (a backslash and an `n`, not a newline) between them. Line
//! terminators and literal `\n` escapes inside a line are removed, so the
//! extraction patterns can run across what used to be separate lines.

use std::io::BufRead;

use regex::Regex;
use tracing::debug;

use crate::error::Result;

/// Separator placed between matching lines in the blob.
pub const LINE_SEPARATOR: &str = "\\n";

/// How a QID is recognized in a log line.
#[derive(Debug, Clone)]
pub enum QidMatcher {
    /// Plain substring match.
    Literal(String),
    /// The QID is interpreted as a regular expression.
    Pattern(Regex),
}

impl QidMatcher {
    pub fn literal(qid: impl Into<String>) -> Self {
        Self::Literal(qid.into())
    }

    /// Compile `qid` as a regular expression.
    pub fn pattern(qid: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(qid)?))
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal(qid) => line.contains(qid.as_str()),
            Self::Pattern(re) => re.is_match(line),
        }
    }
}

/// Strip the terminator and embedded `\n` escapes from one raw line.
fn normalize_line(raw: &[u8]) -> String {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\n', '\r']);
    line.replace(LINE_SEPARATOR, "")
}

/// Read `reader` to the end and return the blob of lines matching `matcher`.
///
/// An empty string means nothing matched. Read errors (including corrupt
/// compressed data) are returned as-is for the caller to attach a path to.
pub fn filter_lines<R: BufRead>(reader: R, matcher: &QidMatcher) -> std::io::Result<String> {
    let mut matched: Vec<String> = Vec::new();
    let mut scanned: u64 = 0;

    for raw in reader.split(b'\n') {
        let raw = raw?;
        scanned += 1;
        let line = normalize_line(&raw);
        if matcher.is_match(&line) {
            matched.push(line);
        }
    }

    debug!(scanned, matched = matched.len(), "Filtered log lines");
    Ok(matched.join(LINE_SEPARATOR))
}
