//! JSON rendering for scripting (`--json`).

use serde_json::json;

use crate::model::record::MessageRecord;

/// The record as pretty-printed JSON with a `found: true` marker.
pub fn record_json(record: &MessageRecord) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(record)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("found".to_string(), json!(true));
    }
    serde_json::to_string_pretty(&value)
}

/// The "no matching entries" outcome as pretty-printed JSON.
pub fn not_found_json(qid: &str, log: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "qid": qid,
        "log": log,
        "found": false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{Status, StatusDetail};

    #[test]
    fn test_record_json_fields() {
        let record = MessageRecord {
            qid: "q1".to_string(),
            timestamp: "Oct 18 10:15:01".to_string(),
            source: None,
            destination: None,
            message_id: "5.1.1".to_string(),
            status: Status {
                primary: "Bounced".to_string(),
                detail: "5.1.1 User unknown".to_string(),
            },
            status_detail: StatusDetail {
                code: "5.1.1".to_string(),
                remainder: "User unknown".to_string(),
            },
            attachments: None,
            spam_details: None,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&record_json(&record).unwrap()).unwrap();
        assert_eq!(parsed["found"], true);
        assert_eq!(parsed["status"]["primary"], "Bounced");
        assert_eq!(parsed["status_detail"]["remainder"], "User unknown");
        assert!(parsed["source"].is_null());
    }

    #[test]
    fn test_not_found_json() {
        let parsed: serde_json::Value =
            serde_json::from_str(&not_found_json("q1", "/var/log/maillog").unwrap()).unwrap();
        assert_eq!(parsed["found"], false);
        assert_eq!(parsed["log"], "/var/log/maillog");
    }
}
