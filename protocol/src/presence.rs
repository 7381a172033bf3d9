//! Presence payload — the profile each member tracks on join.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// The opaque payload a client tracks when it joins a channel. The relay
/// echoes the full member list as the presence snapshot on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceMeta {
    pub participant_id: ParticipantId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub joined_at_epoch_ms: i64,
}

impl PresenceMeta {
    /// Build a presence payload for a participant joining now.
    #[must_use]
    pub fn new(
        participant_id: ParticipantId,
        display_name: impl Into<String>,
        avatar_url: Option<String>,
        joined_at_epoch_ms: i64,
    ) -> Self {
        Self {
            participant_id,
            display_name: display_name.into(),
            avatar_url,
            joined_at_epoch_ms,
        }
    }
}
