//! Frames exchanged over the `/ws` push channel.

use serde::{Deserialize, Serialize};
use warren_core::{Record, StoreEvent};

/// A frame sent by the client.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Follow the jobs of these URLs.
    PendingUrlRequest { urls: UrlList },
    /// The client has seen the completed job for this code.
    #[serde(rename_all = "camelCase")]
    Ack { short_code: String },
}

/// One URL or several.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UrlList {
    One(String),
    Many(Vec<String>),
}

impl UrlList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            UrlList::One(url) => vec![url],
            UrlList::Many(urls) => urls,
        }
    }
}

/// A store event as pushed to clients, named `<table>:<eventType>`.
#[derive(Debug, Serialize)]
pub struct ServerMessage<'a> {
    pub event: String,
    pub data: &'a Record,
}

impl<'a> From<&'a StoreEvent> for ServerMessage<'a> {
    fn from(event: &'a StoreEvent) -> Self {
        Self {
            event: event.name(),
            data: &event.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warren_core::{EventType, Table};

    #[test]
    fn parses_single_and_multiple_urls() {
        let one: ClientMessage =
            serde_json::from_str(r#"{"type":"pendingUrlRequest","urls":"http://a"}"#).unwrap();
        assert_eq!(
            one,
            ClientMessage::PendingUrlRequest {
                urls: UrlList::One("http://a".into())
            }
        );

        let many: ClientMessage = serde_json::from_str(
            r#"{"type":"pendingUrlRequest","urls":["http://a","http://b"]}"#,
        )
        .unwrap();
        let ClientMessage::PendingUrlRequest { urls } = many else {
            panic!("expected pendingUrlRequest");
        };
        assert_eq!(urls.into_vec(), vec!["http://a", "http://b"]);
    }

    #[test]
    fn parses_ack() {
        let ack: ClientMessage =
            serde_json::from_str(r#"{"type":"ack","shortCode":"abc"}"#).unwrap();
        assert_eq!(
            ack,
            ClientMessage::Ack {
                short_code: "abc".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_frames() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"ack"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn server_frame_carries_event_name_and_record() {
        let event = StoreEvent::new(
            Table::Pending,
            EventType::Update,
            Record {
                short_code: "ab".into(),
                progress: 0.2,
                ..Record::pending("http://a")
            },
        );

        let frame = serde_json::to_value(ServerMessage::from(&event)).unwrap();

        assert_eq!(
            frame,
            json!({
                "event": "pending:update",
                "data": {
                    "original": "http://a",
                    "shortCode": "ab",
                    "ack": false,
                    "progress": 0.2,
                }
            })
        );
    }
}
