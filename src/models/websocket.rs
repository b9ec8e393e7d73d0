use serde::{ Serialize, Deserialize };

use crate::admin::AdminView;

#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
    #[serde(rename = "admin")] Admin {
        code: String,
    },
    #[serde(rename = "clear_leads")] ClearLeads {
        code: String,
    },
    #[serde(rename = "export_leads")] ExportLeads {
        code: String,
    },
    #[serde(rename = "reset")]
    Reset,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "banner")] Banner {
        message: String,
    },
    #[serde(rename = "response")] Response {
        content: String,
        timestamp: i64,
    },
    #[serde(rename = "lead_captured")] LeadCaptured {
        phone: String,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "session_reset")]
    SessionReset,
    #[serde(rename = "dashboard")] Dashboard {
        view: AdminView,
    },
    #[serde(rename = "leads_export")] LeadsExport {
        filename: String,
        content_type: String,
        content: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_client_messages() {
        let msg: ClientMessage = serde_json
            ::from_str(r#"{"type":"admin","code":"secret"}"#)
            .unwrap();
        assert!(matches!(msg, ClientMessage::Admin { code } if code == "secret"));

        let msg: ClientMessage = serde_json
            ::from_str(r#"{"type":"chat","content":"hello"}"#)
            .unwrap();
        assert!(matches!(msg, ClientMessage::Chat { content } if content == "hello"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"reset"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Reset));
    }

    #[test]
    fn processing_has_only_a_tag() {
        let json = serde_json::to_string(&ServerMessage::Processing).unwrap();
        assert_eq!(json, r#"{"type":"processing"}"#);
    }
}
