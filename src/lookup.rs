//! One complete lookup: open the log, filter it, extract the record.

use tracing::{debug, info};

use crate::error::{Result, TraceError};
use crate::model::record::MessageRecord;
use crate::parser::extract::extract_record;
use crate::parser::filter::{filter_lines, QidMatcher};
use crate::source::LogSource;

/// Find and parse everything `source` logged about `qid`.
///
/// The log is read to the end and closed before extraction starts. Returns
/// [`TraceError::NoMatchingEntries`] when no line mentions the QID and
/// [`TraceError::MalformedLogEntry`] when lines exist but do not parse.
pub fn trace_message(
    qid: &str,
    matcher: &QidMatcher,
    source: &LogSource,
    buffer_size: usize,
) -> Result<MessageRecord> {
    info!(qid, log = %source.path().display(), "Searching log");

    let blob = {
        let reader = source.open(buffer_size)?;
        filter_lines(reader, matcher).map_err(|e| TraceError::io(source.path(), e))?
    };

    if blob.is_empty() {
        debug!(qid, "No matching lines");
        return Err(TraceError::NoMatchingEntries {
            qid: qid.to_string(),
            log: source.display_name(),
        });
    }

    debug!(qid, blob_len = blob.len(), "Collected matching lines");
    extract_record(qid, &blob)
}
