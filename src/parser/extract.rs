//! Field extractor: turns a QID blob into a [`MessageRecord`].
//!
//! Every field has its own pattern and is searched for independently over the
//! whole blob, so the relative order of the original log lines does not
//! matter. Required fields (timestamp, status, status detail) fail the whole
//! extraction; optional ones are simply left out.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, TraceError};
use crate::model::attachment::Attachment;
use crate::model::record::{Endpoint, MessageRecord, SpamDetail, Status, StatusDetail};
use crate::parser::filter::LINE_SEPARATOR;

/// Marker in the status detail that moves the code/text split one token right.
pub const INTERNAL_ID_MARKER: &str = "InternalId";

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S* \S* \S*)").expect("valid timestamp regex"));

static SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r": from=<?([^\s>,]*).*? relay=(\S* \[[\d.]*\])").expect("valid source regex")
});

static DESTINATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r": to=<?([^\s>,]*).*? relay=(\S* \[[\d.]*\])").expect("valid destination regex")
});

static ATTACHMENT_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"mod=mail cmd=attachment .*? a=[1-9][0-9]*").expect("valid attachment regex")
});

static ATTACHMENT_FIELDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"file=(\S*).*? type=(\S*).*? size=(\S*).*? a=([1-9][0-9]*)")
        .expect("valid attachment fields regex")
});

static STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"stat=(.*?) \((.*?)\)").expect("valid status regex"));

static DETAIL_ONE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+) (.*)").expect("valid detail regex"));

static DETAIL_TWO_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+ \S+) (.*)").expect("valid detail regex"));

static SPAM_DETAILS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Spam-Details: (.*?) engine=").expect("valid spam regex"));

/// Build a [`MessageRecord`] from the blob of lines matching `qid`.
///
/// The blob must be non-empty; an empty blob is the "not found" case and is
/// handled before extraction.
pub fn extract_record(qid: &str, blob: &str) -> Result<MessageRecord> {
    let timestamp = TIMESTAMP_RE
        .captures(blob)
        .map(|c| c[1].to_string())
        .ok_or_else(|| TraceError::malformed(qid, "timestamp", "no date prefix"))?;

    let status = extract_status(blob)
        .ok_or_else(|| TraceError::malformed(qid, "status", "no stat= clause"))?;

    let status_detail = split_status_detail(&status.detail).ok_or_else(|| {
        TraceError::malformed(
            qid,
            "status detail",
            format!("cannot split '{}'", status.detail),
        )
    })?;
    let message_id = status_detail.code.clone();

    let source = extract_endpoint(qid, blob, ": from", &SOURCE_RE, "source");
    let destination = extract_endpoint(qid, blob, ": to", &DESTINATION_RE, "destination");
    let attachments = extract_attachments(qid, blob)?;
    let spam_details = extract_spam_details(blob);

    debug!(
        qid,
        has_source = source.is_some(),
        has_destination = destination.is_some(),
        attachments = attachments.as_ref().map_or(0, Vec::len),
        spam_details = spam_details.as_ref().map_or(0, Vec::len),
        "Extracted message record"
    );

    Ok(MessageRecord {
        qid: qid.to_string(),
        timestamp,
        source,
        destination,
        message_id,
        status,
        status_detail,
        attachments,
        spam_details,
    })
}

/// Address and relay following `marker`.
///
/// `None` when the marker is absent or when the relay is not a
/// `host [ipv4]` pair (unresolved hosts, IPv6 relays).
fn extract_endpoint(
    qid: &str,
    blob: &str,
    marker: &str,
    re: &Regex,
    field: &'static str,
) -> Option<Endpoint> {
    if !blob.contains(marker) {
        return None;
    }
    let Some(caps) = re.captures(blob) else {
        debug!(qid, field, marker, "Marker without address and relay, leaving it out");
        return None;
    };
    Some(Endpoint {
        address: caps[1].to_string(),
        relay: caps[2].to_string(),
    })
}

fn extract_status(blob: &str) -> Option<Status> {
    let caps = STATUS_RE.captures(blob)?;
    Some(Status {
        primary: caps[1].to_string(),
        detail: caps[2].to_string(),
    })
}

/// Split a status detail into its code (or id) and the remaining text.
///
/// With an [`INTERNAL_ID_MARKER`] present the code is two tokens
/// (`"200 2.0.0 OK InternalId=42"` → `"200 2.0.0"`), otherwise one
/// (`"5.1.1 User unknown"` → `"5.1.1"`).
pub fn split_status_detail(detail: &str) -> Option<StatusDetail> {
    let caps = if detail.contains(INTERNAL_ID_MARKER) {
        DETAIL_TWO_TOKEN_RE.captures(detail)?
    } else {
        DETAIL_ONE_TOKEN_RE.captures(detail)?
    };
    Some(StatusDetail {
        code: caps[1].to_string(),
        remainder: caps[2].to_string(),
    })
}

/// Attachment entries in log order. Each entry is isolated within its own
/// log line.
fn extract_attachments(qid: &str, blob: &str) -> Result<Option<Vec<Attachment>>> {
    let entries: Vec<&str> = blob
        .split(LINE_SEPARATOR)
        .flat_map(|line| ATTACHMENT_ENTRY_RE.find_iter(line))
        .map(|m| m.as_str())
        .collect();
    if entries.is_empty() {
        return Ok(None);
    }

    entries
        .into_iter()
        .map(|entry| parse_attachment(qid, entry))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn parse_attachment(qid: &str, entry: &str) -> Result<Attachment> {
    let caps = ATTACHMENT_FIELDS_RE.captures(entry).ok_or_else(|| {
        TraceError::malformed(
            qid,
            "attachment",
            format!("missing file/type/size/index in '{entry}'"),
        )
    })?;
    let size = caps[3].parse::<u64>().map_err(|_| {
        TraceError::malformed(qid, "attachment", format!("bad size '{}'", &caps[3]))
    })?;
    let index = caps[4].parse::<u32>().map_err(|_| {
        TraceError::malformed(qid, "attachment", format!("bad index '{}'", &caps[4]))
    })?;
    Ok(Attachment {
        filename: caps[1].to_string(),
        content_type: caps[2].to_string(),
        size,
        index,
    })
}

/// Spam scoring pairs, ordered by their raw `key=value` token.
fn extract_spam_details(blob: &str) -> Option<Vec<SpamDetail>> {
    let content = SPAM_DETAILS_RE.captures(blob)?.get(1)?.as_str();

    let mut tokens: Vec<&str> = content.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return None;
    }
    tokens.sort_unstable();

    Some(
        tokens
            .into_iter()
            .map(|token| match token.split_once('=') {
                Some((key, value)) => SpamDetail {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                None => SpamDetail {
                    key: token.to_string(),
                    value: String::new(),
                },
            })
            .collect(),
    )
}
