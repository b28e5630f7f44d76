//! Wire frames
//!
//! A frame is the unit written to and read from a channel: a textual token
//! followed by a single NUL terminator, never longer than [`MAX_FRAME_LEN`]
//! bytes in total.

use thiserror::Error;

/// Upper bound on a frame, terminator included
pub const MAX_FRAME_LEN: usize = 256;

/// Reasons a frame cannot be turned into a token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Empty frame")]
    Empty,

    #[error("Frame of {len} bytes exceeds the {MAX_FRAME_LEN}-byte limit")]
    Oversized { len: usize },

    #[error("Frame is not a single NUL-terminated token")]
    Unterminated,

    #[error("Frame is not valid UTF-8")]
    NotUtf8,

    #[error("Unidentified message received: \"{0}\"")]
    UnknownToken(String),
}

/// Raw bytes of one message on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Vec<u8>);

impl Frame {
    /// Wrap raw bytes without validation
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Encode a token, appending the terminator
    pub fn from_token(token: &str) -> Result<Self, WireError> {
        if token.as_bytes().contains(&0) {
            return Err(WireError::Unterminated);
        }
        let len = token.len() + 1;
        if len > MAX_FRAME_LEN {
            return Err(WireError::Oversized { len });
        }

        let mut bytes = Vec::with_capacity(len);
        bytes.extend_from_slice(token.as_bytes());
        bytes.push(0);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the token carried by this frame
    pub fn token(&self) -> Result<&str, WireError> {
        let bytes = self.0.as_slice();
        if bytes.is_empty() {
            return Err(WireError::Empty);
        }
        if bytes.len() > MAX_FRAME_LEN {
            return Err(WireError::Oversized { len: bytes.len() });
        }

        let Some((&0, body)) = bytes.split_last() else {
            return Err(WireError::Unterminated);
        };
        if body.contains(&0) {
            return Err(WireError::Unterminated);
        }

        std::str::from_utf8(body).map_err(|_| WireError::NotUtf8)
    }
}
