//! Action-tagged request/response messaging between the UI and a page.
//!
//! Wire shapes:
//!
//! | request                          | response                          |
//! |----------------------------------|-----------------------------------|
//! | `{"action":"applyCSS","css":…}`  | `{"success":true}` or `{"error":…}` |
//! | `{"action":"removeCSS"}`         | `{"success":true}`                |
//! | `{"action":"ping"}`              | `{"success":true,"ready":true}`   |
//! | anything else                    | `{"error":"Unknown action"}`      |

use async_trait::async_trait;
use restyle_common::MessagingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::event::SyncEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    /// Apply already-transformed CSS. Absent or blank CSS means remove.
    #[serde(rename = "applyCSS")]
    ApplyCss {
        #[serde(default)]
        css: Option<String>,
    },
    #[serde(rename = "removeCSS")]
    RemoveCss,
    #[serde(rename = "ping")]
    Ping,
    #[serde(other)]
    Unknown,
}

impl Request {
    /// Decode a raw message. Never fails: malformed messages become
    /// [`Request::Unknown`], and an `applyCSS` whose `css` is not text
    /// becomes an `applyCSS` with no CSS.
    pub fn from_value(value: Value) -> Self {
        let is_apply = value.get("action").and_then(Value::as_str) == Some("applyCSS");
        match serde_json::from_value(value) {
            Ok(request) => request,
            Err(_) if is_apply => Self::ApplyCss { css: None },
            Err(_) => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ok {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ready: Option<bool>,
    },
    Error {
        error: String,
    },
}

impl Response {
    pub fn success() -> Self {
        Self::Ok {
            success: true,
            ready: None,
        }
    }

    pub fn pong() -> Self {
        Self::Ok {
            success: true,
            ready: Some(true),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn unknown_action() -> Self {
        Self::error("Unknown action")
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { success: true, .. })
    }
}

/// A request delivered to a controller, with the channel for its answer.
#[derive(Debug)]
pub struct Inbound {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

impl Inbound {
    pub fn new(request: Request) -> (Self, oneshot::Receiver<Response>) {
        let (reply, rx) = oneshot::channel();
        (Self { request, reply }, rx)
    }

    /// Answer the request. A sender that stopped waiting is not an error.
    pub fn respond(self, response: Response) {
        let _ = self.reply.send(response);
    }
}

/// Sending side of the messaging port, used by the controlling UI.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, MessagingError>;
}

/// In-process [`MessageSender`] feeding a controller's event inbox.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::Sender<SyncEvent>,
}

impl ChannelSender {
    pub fn new(tx: mpsc::Sender<SyncEvent>) -> Self {
        Self { tx }
    }

    /// The raw inbox sender, for feeding page events alongside messages.
    pub fn events(&self) -> mpsc::Sender<SyncEvent> {
        self.tx.clone()
    }
}

#[async_trait]
impl MessageSender for ChannelSender {
    async fn send(&self, request: Request) -> Result<Response, MessagingError> {
        let (inbound, rx) = Inbound::new(request);
        self.tx
            .send(SyncEvent::Message(inbound))
            .await
            .map_err(|_| MessagingError::NoReceiver)?;
        rx.await.map_err(|_| MessagingError::Dropped)
    }
}

/// A connected sender and controller inbox.
pub fn message_channel(capacity: usize) -> (ChannelSender, mpsc::Receiver<SyncEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_known_actions() {
        assert_eq!(
            Request::from_value(json!({"action": "applyCSS", "css": "a{}"})),
            Request::ApplyCss {
                css: Some("a{}".into())
            }
        );
        assert_eq!(Request::from_value(json!({"action": "removeCSS"})), Request::RemoveCss);
        assert_eq!(Request::from_value(json!({"action": "ping"})), Request::Ping);
    }

    #[test]
    fn apply_without_text_css_has_no_css() {
        assert_eq!(
            Request::from_value(json!({"action": "applyCSS"})),
            Request::ApplyCss { css: None }
        );
        assert_eq!(
            Request::from_value(json!({"action": "applyCSS", "css": 42})),
            Request::ApplyCss { css: None }
        );
    }

    #[test]
    fn unknown_and_malformed_messages_are_unknown() {
        assert_eq!(Request::from_value(json!({"action": "reboot"})), Request::Unknown);
        assert_eq!(Request::from_value(json!({"no": "action"})), Request::Unknown);
        assert_eq!(Request::from_value(json!("ping")), Request::Unknown);
    }

    #[test]
    fn request_serializes_with_action_tag() {
        let value = serde_json::to_value(Request::ApplyCss {
            css: Some("x".into()),
        })
        .unwrap();
        assert_eq!(value, json!({"action": "applyCSS", "css": "x"}));
    }

    #[test]
    fn responses_have_exact_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Response::success()).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            serde_json::to_value(Response::pong()).unwrap(),
            json!({"success": true, "ready": true})
        );
        assert_eq!(
            serde_json::to_value(Response::unknown_action()).unwrap(),
            json!({"error": "Unknown action"})
        );
    }

    #[test]
    fn responses_round_trip_from_wire() {
        let resp: Response = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(resp, Response::error("boom"));
        assert!(!resp.is_success());
        let resp: Response = serde_json::from_value(json!({"success": true, "ready": true})).unwrap();
        assert_eq!(resp, Response::pong());
    }

    #[tokio::test]
    async fn channel_sender_reports_missing_receiver() {
        let (sender, rx) = message_channel(4);
        drop(rx);
        let err = sender.send(Request::Ping).await.unwrap_err();
        assert!(matches!(err, MessagingError::NoReceiver));
    }

    #[tokio::test]
    async fn channel_sender_reports_dropped_reply() {
        let (sender, mut rx) = message_channel(4);
        let task = tokio::spawn(async move {
            // Take the message and drop it unanswered.
            let _ = rx.recv().await;
        });
        let err = sender.send(Request::Ping).await.unwrap_err();
        assert!(matches!(err, MessagingError::Dropped));
        task.await.unwrap();
    }
}
