//! Reaction set - per-message mapping from emoji to the users who applied it
//!
//! The whole reaction lifecycle is a single transition: `toggle` adds the
//! (emoji, user) relation if absent and removes it if present. An emoji entry
//! with no remaining users is deleted, never stored empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-message reaction state: emoji symbol -> usernames in insertion order
///
/// Serializes transparently as a JSON object (`{"👍": ["bob", "carol"]}`),
/// which is both the wire form and the persisted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reactions(BTreeMap<String, Vec<String>>);

impl Reactions {
    /// Create an empty reaction set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a user's reaction for an emoji
    ///
    /// Adds `username` to the emoji's user list if absent; removes it if
    /// present, deleting the emoji entry when its list becomes empty.
    /// Applying the same toggle twice returns the set to its prior state.
    pub fn toggle(&mut self, emoji: &str, username: &str) {
        match self.0.get_mut(emoji) {
            Some(users) => {
                if let Some(pos) = users.iter().position(|u| u == username) {
                    users.remove(pos);
                    if users.is_empty() {
                        self.0.remove(emoji);
                    }
                } else {
                    users.push(username.to_string());
                }
            }
            None => {
                self.0.insert(emoji.to_string(), vec![username.to_string()]);
            }
        }
    }

    /// Get the users who reacted with an emoji
    pub fn users(&self, emoji: &str) -> Option<&[String]> {
        self.0.get(emoji).map(Vec::as_slice)
    }

    /// Check if a specific user has reacted with an emoji
    pub fn contains(&self, emoji: &str, username: &str) -> bool {
        self.0
            .get(emoji)
            .is_some_and(|users| users.iter().any(|u| u == username))
    }

    /// Check if no reactions are present
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct emoji with at least one reaction
    #[inline]
    pub fn emoji_count(&self) -> usize {
        self.0.len()
    }

    /// Invariant check: no emoji entry maps to an empty user list and no
    /// user appears twice under the same emoji
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.0.values().all(|users| {
            !users.is_empty()
                && users
                    .iter()
                    .enumerate()
                    .all(|(i, u)| !users[..i].contains(u))
        })
    }
}
