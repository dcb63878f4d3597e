//! Human-readable report of a [`MessageRecord`].

use crate::model::record::{Endpoint, MessageRecord, SpamDetail};

use super::style::{Palette, StyleToken};

const LABEL_WIDTH: usize = 15;
const VALUE_WIDTH: usize = 27;
const HEADING_WIDTH: usize = 13;

/// Render the full report, one line per `\n`.
///
/// Sections without data (no sender, no attachments, ...) are left out.
pub fn render_report(record: &MessageRecord, palette: &Palette) -> String {
    let mut out = String::new();

    heading(&mut out, palette, "Details");
    field(&mut out, palette, "QID:", &record.qid);
    field(&mut out, palette, "MsgID:", &record.message_id);
    field(&mut out, palette, "Date:", &record.timestamp);
    field(
        &mut out,
        palette,
        "Status:",
        &format!(
            "{}, {}",
            record.status.primary, record.status_detail.remainder
        ),
    );

    if let Some(source) = &record.source {
        endpoint(&mut out, palette, "Source", source);
    }
    if let Some(destination) = &record.destination {
        endpoint(&mut out, palette, "Destination", destination);
    }

    if let Some(attachments) = &record.attachments {
        heading(&mut out, palette, "Attachments");
        for a in attachments {
            let value = format!("{:3} {:4}KB  {}", a.content_type, a.size_kb(), a.filename);
            field(&mut out, palette, &a.index.to_string(), &value);
        }
    }

    if let Some(details) = &record.spam_details {
        heading(&mut out, palette, "Spam Details");
        spam_grid(&mut out, palette, details);
    }

    out.push('\n');
    out
}

fn heading(out: &mut String, palette: &Palette, title: &str) {
    out.push('\n');
    out.push_str(&palette.paint(
        StyleToken::Heading,
        &format!("  {title:<HEADING_WIDTH$}"),
    ));
    out.push('\n');
}

fn field(out: &mut String, palette: &Palette, label: &str, value: &str) {
    out.push_str(&cell(palette, label, value));
    out.push('\n');
}

fn cell(palette: &Palette, label: &str, value: &str) -> String {
    format!(
        "{}  {value:<VALUE_WIDTH$}",
        palette.paint(StyleToken::Label, &format!("{label:>LABEL_WIDTH$}"))
    )
}

fn endpoint(out: &mut String, palette: &Palette, title: &str, endpoint: &Endpoint) {
    heading(out, palette, title);
    field(out, palette, "Address:", &endpoint.address);
    field(out, palette, "Relay:", &endpoint.relay);
}

/// Two cells per row; an odd count leaves the last row half empty.
fn spam_grid(out: &mut String, palette: &Palette, details: &[SpamDetail]) {
    let cells: Vec<String> = details
        .iter()
        .map(|d| {
            let value = if d.is_flagged() {
                palette.paint(StyleToken::Alert, &format!("{:<VALUE_WIDTH$}", d.value))
            } else {
                d.value.clone()
            };
            cell(palette, &d.key, &value)
        })
        .collect();

    for row in cells.chunks(2) {
        out.push_str(&row.concat());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attachment::Attachment;
    use crate::model::record::{Status, StatusDetail};

    fn record() -> MessageRecord {
        MessageRecord {
            qid: "49IEF1aB012345".to_string(),
            timestamp: "Oct 18 10:15:01".to_string(),
            source: Some(Endpoint {
                address: "alice@example.org".to_string(),
                relay: "mail.example.org [203.0.113.5]".to_string(),
            }),
            destination: None,
            message_id: "49IEF4xZ998877".to_string(),
            status: Status {
                primary: "Sent".to_string(),
                detail: "49IEF4xZ998877 Message accepted for delivery".to_string(),
            },
            status_detail: StatusDetail {
                code: "49IEF4xZ998877".to_string(),
                remainder: "Message accepted for delivery".to_string(),
            },
            attachments: None,
            spam_details: None,
        }
    }

    fn spam(key: &str, value: &str) -> SpamDetail {
        SpamDetail {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_details_block() {
        let out = render_report(&record(), &Palette::plain());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1].trim_end(), "  Details");
        assert_eq!(lines[2].trim_end(), "           QID:  49IEF1aB012345");
        assert_eq!(lines[3].trim_end(), "         MsgID:  49IEF4xZ998877");
        assert_eq!(lines[4].trim_end(), "          Date:  Oct 18 10:15:01");
        assert_eq!(
            lines[5].trim_end(),
            "        Status:  Sent, Message accepted for delivery"
        );
        assert!(out.ends_with("\n\n"));
    }

    #[test]
    fn test_absent_sections_are_omitted() {
        let out = render_report(&record(), &Palette::plain());
        assert!(out.contains("  Source"));
        assert!(out.contains("alice@example.org"));
        assert!(!out.contains("Destination"));
        assert!(!out.contains("Attachments"));
        assert!(!out.contains("Spam Details"));
    }

    #[test]
    fn test_attachment_row_truncates_kb() {
        let mut rec = record();
        rec.attachments = Some(vec![Attachment {
            filename: "invoice.pdf".to_string(),
            content_type: "pdf".to_string(),
            size: 1999,
            index: 1,
        }]);
        let out = render_report(&rec, &Palette::plain());
        let row = out
            .lines()
            .find(|l| l.contains("invoice.pdf"))
            .expect("attachment row");
        assert_eq!(row.trim_end(), "              1  pdf    1KB  invoice.pdf");
    }

    #[test]
    fn test_spam_grid_two_columns_with_odd_count() {
        let mut rec = record();
        rec.spam_details = Some(vec![spam("bulk", "0"), spam("reason", "mlx"), spam("score", "5")]);
        let out = render_report(&rec, &Palette::plain());
        let lines: Vec<&str> = out.lines().collect();
        let start = lines
            .iter()
            .position(|l| l.trim() == "Spam Details")
            .expect("spam heading");
        let first = lines[start + 1];
        assert!(first.contains("bulk"));
        assert!(first.contains("reason"));
        let second = lines[start + 2];
        assert!(second.contains("score"));
        assert!(!second.contains("bulk"));
        assert_eq!(lines[start + 3], "");
    }

    #[test]
    fn test_only_flagged_values_are_painted() {
        let mut rec = record();
        rec.spam_details = Some(vec![
            spam("bulkscore", "0"),
            spam("classifier", "clean"),
            spam("phishscore", "-3"),
        ]);
        let out = render_report(&rec, &Palette::ansi());
        let alert = Palette::ansi().paint(StyleToken::Alert, &format!("{:<27}", "-3"));
        assert!(out.contains(&alert));
        let not_flagged = Palette::ansi().paint(StyleToken::Alert, &format!("{:<27}", "0"));
        assert!(!out.contains(&not_flagged));
        let clean = Palette::ansi().paint(StyleToken::Alert, &format!("{:<27}", "clean"));
        assert!(!out.contains(&clean));
    }
}
