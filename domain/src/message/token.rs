//! Protocol messages

use super::frame::{Frame, WireError};
use serde::{Deserialize, Serialize};

/// The closed set of protocol messages
///
/// Messages carry no payload; on the wire each one is a fixed token.
///
/// # Example
///
/// ```
/// use barrier_domain::Message;
///
/// let frame = Message::Confirm.encode();
/// assert_eq!(frame.as_bytes(), b"::CONFIRMATION::\0");
/// assert_eq!(Message::decode(&frame).unwrap(), Message::Confirm);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Message {
    /// Controller asks a worker to start a quorum round
    Poll,
    /// Worker asks a peer worker to confirm reachability
    Request,
    /// Reply to a request, or a worker's quorum report to the controller
    Confirm,
    /// Controller tells a worker to stop
    Die,
}

impl Message {
    pub const ALL: [Message; 4] = [
        Message::Poll,
        Message::Request,
        Message::Confirm,
        Message::Die,
    ];

    /// Wire token for this message
    pub const fn token(self) -> &'static str {
        match self {
            Message::Poll => "::POLL::",
            Message::Request => "::REQUEST::",
            Message::Confirm => "::CONFIRMATION::",
            Message::Die => "::DIE::",
        }
    }

    pub fn encode(self) -> Frame {
        let token = self.token();
        let mut bytes = Vec::with_capacity(token.len() + 1);
        bytes.extend_from_slice(token.as_bytes());
        bytes.push(0);
        Frame::from_bytes(bytes)
    }

    pub fn decode(frame: &Frame) -> Result<Self, WireError> {
        frame.token()?.parse()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for Message {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::ALL
            .into_iter()
            .find(|m| m.token() == s)
            .ok_or_else(|| WireError::UnknownToken(s.to_string()))
    }
}
