//! Presence-authoritative cursor roster.
//!
//! DESIGN
//! ======
//! Presence snapshots are the source of truth for who exists; broadcasts
//! only update positions. Every `presence_sync` rebuilds the whole map
//! (self excluded) and merges the previously-known position into the
//! rebuilt entries, so a missed broadcast self-heals on the next snapshot
//! and a departed participant's cursor disappears in the same pass. A
//! `cursor_move` for an id presence has never listed is discarded — ghost
//! cursors would otherwise never clean up.

use std::collections::HashMap;

use protocol::{ParticipantId, PresenceMeta};

/// Pointer position as percentages of the shared container. Nominally in
/// [0, 100]; out-of-range samples are carried without clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

/// A remote participant as the cursor layer sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub username: String,
    pub avatar_url: Option<String>,
    pub position: CursorPosition,
    pub last_seen_at: i64,
}

/// Roster of remote cursors, rebuilt from every presence snapshot.
#[derive(Debug, Clone)]
pub struct CursorRoster {
    self_id: ParticipantId,
    entries: HashMap<ParticipantId, ParticipantRecord>,
}

impl CursorRoster {
    #[must_use]
    pub fn new(self_id: ParticipantId) -> Self {
        Self { self_id, entries: HashMap::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&ParticipantRecord> {
        self.entries.get(&id)
    }

    /// Iterate over the current remote cursors.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantRecord)> {
        self.entries.iter()
    }

    /// Rebuild the roster from an authoritative membership snapshot.
    ///
    /// Entries are replaced wholesale: profiles come from the snapshot,
    /// known positions are merged in, ids absent from the snapshot are gone
    /// when this returns. Applying the same snapshot twice is idempotent.
    pub fn apply_sync(&mut self, members: &[PresenceMeta]) {
        let mut rebuilt = HashMap::with_capacity(members.len());
        for meta in members {
            if meta.participant_id == self.self_id {
                continue;
            }
            let position = self
                .entries
                .get(&meta.participant_id)
                .map(|known| known.position)
                .unwrap_or_default();
            rebuilt.insert(
                meta.participant_id,
                ParticipantRecord {
                    username: meta.display_name.clone(),
                    avatar_url: meta.avatar_url.clone(),
                    position,
                    last_seen_at: meta.joined_at_epoch_ms,
                },
            );
        }
        self.entries = rebuilt;
    }

    /// Update the position of an already-known participant. Unknown ids and
    /// the local id are discarded; returns whether anything changed.
    pub fn apply_cursor_move(&mut self, id: ParticipantId, x: f64, y: f64) -> bool {
        if id == self.self_id {
            return false;
        }
        let Some(record) = self.entries.get_mut(&id) else {
            return false;
        };
        record.position = CursorPosition { x, y };
        true
    }
}

/// Convert a pointer sample to percentages of a bounded container.
///
/// No clamping: a pointer dragged outside the container produces values
/// outside [0, 100] and they travel as-is. A degenerate container (zero or
/// negative extent) maps to the origin rather than dividing by zero.
#[must_use]
pub fn relative_position(px: f64, py: f64, width: f64, height: f64) -> CursorPosition {
    if width <= 0.0 || height <= 0.0 {
        return CursorPosition::default();
    }
    CursorPosition { x: px / width * 100.0, y: py / height * 100.0 }
}

#[cfg(test)]
#[path = "cursor_test.rs"]
mod tests;
