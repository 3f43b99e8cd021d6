// ABOUTME: Frames exchanged with the backend exec endpoint and session connection state
// Input travels as raw text frames; the only structured frame is the resize control message

use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// `{"type":"resize","cols":..,"rows":..}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlMessage {
    Resize { cols: u16, rows: u16 },
}

/// Client to server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Input(String),
    Resize(TerminalSize),
    Close,
}

impl Outbound {
    pub fn into_ws(self) -> tungstenite::Message {
        match self {
            Self::Input(data) => tungstenite::Message::Text(data),
            Self::Resize(size) => {
                let control = ControlMessage::Resize {
                    cols: size.cols,
                    rows: size.rows,
                };
                // infallible for this shape
                let json = serde_json::to_string(&control).unwrap_or_default();
                tungstenite::Message::Text(json)
            }
            Self::Close => tungstenite::Message::Close(None),
        }
    }
}

/// Server to client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Data(Vec<u8>),
    Closed,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_frame_shape() {
        let frame = Outbound::Resize(TerminalSize::new(120, 40)).into_ws();
        let tungstenite::Message::Text(text) = frame else {
            panic!("resize must be a text frame");
        };
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "resize");
        assert_eq!(value["cols"], 120);
        assert_eq!(value["rows"], 40);
    }

    #[test]
    fn test_input_is_sent_verbatim() {
        let frame = Outbound::Input("ls -la\r".to_string()).into_ws();
        assert_eq!(frame, tungstenite::Message::Text("ls -la\r".to_string()));
    }
}
