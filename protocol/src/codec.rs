//! JSON codec for wire messages.
//!
//! Encoding and decoding both return typed errors so transport code can
//! propagate them with `?` instead of silently swallowing malformed input.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ClientMessage, ServerMessage};

/// Error returned by the encode/decode functions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be decoded as a known wire message.
    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),
    /// The value could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Decode)
}

fn encode<T: Serialize>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(CodecError::Encode)
}

/// Decode a client→relay message.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for unknown tags or malformed payloads.
pub fn decode_client(text: &str) -> Result<ClientMessage, CodecError> {
    decode(text)
}

/// Decode a relay→client message.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for unknown tags or malformed payloads.
pub fn decode_server(text: &str) -> Result<ServerMessage, CodecError> {
    decode(text)
}

/// Encode a client→relay message.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_client(msg: &ClientMessage) -> Result<String, CodecError> {
    encode(msg)
}

/// Encode a relay→client message.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_server(msg: &ServerMessage) -> Result<String, CodecError> {
    encode(msg)
}
