//! The parsed trail of one message.

use super::attachment::Attachment;

/// One side of a transfer: an address and the relay it went through.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Endpoint {
    /// Envelope address, angle brackets removed.
    pub address: String,
    /// `hostname [ip]` of the relay.
    pub relay: String,
}

/// The `stat=<primary> (<detail>)` clause.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Status {
    /// Outer status word, e.g. `"Sent"`, `"Deferred"`.
    pub primary: String,
    /// Text between the parentheses.
    pub detail: String,
}

/// The status detail split into its leading code or id and the rest.
///
/// When the detail carries an `InternalId` marker the code is the first two
/// tokens, otherwise just the first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StatusDetail {
    pub code: String,
    pub remainder: String,
}

/// A single `key=value` pair from the `Spam-Details:` section.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SpamDetail {
    pub key: String,
    pub value: String,
}

impl SpamDetail {
    /// Whether the value deserves attention: a (optionally signed) integer
    /// that is not zero. `"0"` and `"clean"` are not flagged, `"-3"` is.
    pub fn is_flagged(&self) -> bool {
        let digits = self
            .value
            .strip_prefix(['+', '-'])
            .unwrap_or(self.value.as_str());
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits.bytes().any(|b| b != b'0')
    }
}

/// Everything the log says about one queue id.
///
/// Built once by [`crate::parser::extract::extract_record`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MessageRecord {
    /// The queue id that was searched for.
    pub qid: String,

    /// First three tokens of the earliest line, in the log's own format
    /// (e.g. `"Oct 18 10:15:01"`).
    pub timestamp: String,

    /// Sender side, present iff the log has a `from=` clause.
    pub source: Option<Endpoint>,

    /// Recipient side, present iff the log has a `to=` clause.
    pub destination: Option<Endpoint>,

    /// Id taken from the status detail.
    pub message_id: String,

    pub status: Status,

    pub status_detail: StatusDetail,

    /// Attachment scanner entries, in log order.
    pub attachments: Option<Vec<Attachment>>,

    /// Spam scoring pairs, sorted by raw `key=value` token.
    pub spam_details: Option<Vec<SpamDetail>>,
}
