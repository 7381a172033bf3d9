//! Shared message vocabulary for the wheel channel protocol.
//!
//! This crate owns the wire representation used by every peer: the closed
//! set of broadcast events, the envelope that carries them, the presence
//! payload each member tracks, and the client↔relay wire messages. The
//! relay and every client decode at the transport boundary and reject
//! anything outside this vocabulary rather than trusting it.

pub mod codec;
pub mod envelope;
pub mod event;
pub mod presence;
pub mod wire;

pub use codec::CodecError;
pub use envelope::Envelope;
pub use event::Event;
pub use presence::PresenceMeta;
pub use wire::{ClientMessage, ServerMessage};

/// Opaque stable identifier for a connected user.
pub type ParticipantId = uuid::Uuid;
