//! Socket.IO Packet Codec
//!
//! The push service speaks Socket.IO v4 on top of the Engine.IO v4 WebSocket
//! transport. Each WebSocket text frame carries one Engine.IO packet whose
//! first character is its type; a `4` (message) packet nests a Socket.IO
//! packet with its own type digit.
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,"pingTimeout":20000}   open
//! 2 / 3                                                     ping / pong
//! 40{"token":".."}                                          connect (client)
//! 40{"sid":".."}                                            connect ack
//! 44{"message":".."}                                        connect error
//! 42["alert",{..}]                                          event
//! 41                                                        disconnect
//! ```
//!
//! Only the default namespace is used, and binary attachments are not.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Query string appended to the API base to reach the push endpoint
pub const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

/// Push endpoint URL for an `http(s)://` API base
pub fn socket_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}{}", base, SOCKET_PATH)
}

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("Empty frame")]
    Empty,

    #[error("Unknown packet type: {0}")]
    UnknownType(String),

    #[error("Malformed payload: {0}")]
    Payload(String),
}

/// Engine.IO handshake sent by the server right after the upgrade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// One decoded WebSocket text frame
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace connect; the client sends auth, the server answers with its sid
    Connect(Option<Value>),
    Disconnect,
    Event { name: String, data: Value },
    ConnectError(String),
}

impl Packet {
    /// Connect packet carrying the bearer token as Socket.IO auth
    pub fn connect_with_token(token: &str) -> Self {
        Self::Connect(Some(serde_json::json!({ "token": token })))
    }

    pub fn parse(frame: &str) -> Result<Self, FrameError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(FrameError::Empty)?;
        let rest = chars.as_str();

        match kind {
            '0' => serde_json::from_str(rest)
                .map(Self::Open)
                .map_err(|e| FrameError::Payload(e.to_string())),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => parse_message(rest),
            '6' => Ok(Self::Noop),
            other => Err(FrameError::UnknownType(other.to_string())),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => {
                format!("0{}", serde_json::to_string(handshake).unwrap_or_default())
            }
            Self::Close => "1".to_string(),
            Self::Ping => "2".to_string(),
            Self::Pong => "3".to_string(),
            Self::Noop => "6".to_string(),
            Self::Connect(None) => "40".to_string(),
            Self::Connect(Some(auth)) => format!("40{}", auth),
            Self::Disconnect => "41".to_string(),
            Self::Event { name, data } => {
                format!("42{}", Value::Array(vec![Value::String(name.clone()), data.clone()]))
            }
            Self::ConnectError(message) => {
                format!("44{}", serde_json::json!({ "message": message }))
            }
        }
    }
}

/// Decode the Socket.IO packet nested in an Engine.IO message
fn parse_message(body: &str) -> Result<Packet, FrameError> {
    let mut chars = body.chars();
    let kind = chars.next().ok_or(FrameError::Empty)?;
    let payload = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        '0' => {
            if payload.is_empty() {
                Ok(Packet::Connect(None))
            } else {
                json(payload).map(|v| Packet::Connect(Some(v)))
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => {
            let Value::Array(mut items) = json(payload)? else {
                return Err(FrameError::Payload("event is not an array".to_string()));
            };
            if items.is_empty() {
                return Err(FrameError::Payload("event without a name".to_string()));
            }
            let Value::String(name) = items.remove(0) else {
                return Err(FrameError::Payload("event name is not a string".to_string()));
            };
            let data = if items.is_empty() {
                Value::Null
            } else {
                items.remove(0)
            };
            Ok(Packet::Event { name, data })
        }
        '4' => {
            let message = match json(payload) {
                Ok(Value::Object(map)) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Connection refused")
                    .to_string(),
                Ok(Value::String(s)) => s,
                _ => payload.to_string(),
            };
            Ok(Packet::ConnectError(message))
        }
        other => Err(FrameError::UnknownType(format!("4{}", other))),
    }
}

fn json(payload: &str) -> Result<Value, FrameError> {
    serde_json::from_str(payload).map_err(|e| FrameError::Payload(e.to_string()))
}

/// `/admin,["x"]` → `["x"]`
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(idx) => &body[idx + 1..],
            None => "",
        }
    } else {
        body
    }
}

/// `12["x"]` → `["x"]`
fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}
