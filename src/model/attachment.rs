//! Attachment metadata as reported by the gateway's attachment scanner.

/// One `mod=mail cmd=attachment` entry.
///
/// Only what the log line carries is kept; the payload itself never
/// passes through the log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Attachment {
    /// File path or name as logged (`file=`).
    pub filename: String,

    /// Scanner-detected type (`type=`), e.g. `"pdf"`, `"zip"`.
    pub content_type: String,

    /// Size in bytes (`size=`).
    pub size: u64,

    /// 1-based position of the attachment within the message (`a=`).
    pub index: u32,
}

impl Attachment {
    /// Size in whole kilobytes, truncated (1999 bytes → 1).
    pub fn size_kb(&self) -> u64 {
        self.size / 1000
    }
}
