//! Mutable per-session state: the card lifecycle sets and the session ending.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// The clock reached zero.
    TimeUp,
    /// A win card entered the inventory.
    Victory,
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ending::TimeUp => write!(f, "time_up"),
            Ending::Victory => write!(f, "victory"),
        }
    }
}

/// Lifecycle sets for the player's collection.
///
/// `owned` preserves insertion order for display; `revealed` and `completed`
/// are subsets of `owned` and only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    owned: Vec<String>,
    revealed: HashSet<String>,
    completed: HashSet<String>,
    unlocked_hints: HashSet<String>,
}

impl InventoryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the starting hand. Ids are assumed validated by the catalog.
    #[must_use]
    pub fn with_starting_cards(ids: &[String]) -> Self {
        let mut state = Self::new();
        for id in ids {
            state.own(id);
        }
        state
    }

    /// Add a card to the collection. Returns false if it was already owned.
    pub fn own(&mut self, id: &str) -> bool {
        if self.is_owned(id) {
            return false;
        }
        self.owned.push(id.to_string());
        true
    }

    /// Mark an owned card as flipped at least once. Idempotent; a card that
    /// is not owned cannot be revealed.
    pub fn reveal(&mut self, id: &str) -> bool {
        if !self.is_owned(id) {
            return false;
        }
        self.revealed.insert(id.to_string())
    }

    /// Mark an owned card's puzzle as solved. Idempotent; completion of an
    /// id that is not owned is skipped so `completed` stays a subset of
    /// `owned`.
    pub fn complete(&mut self, id: &str) -> bool {
        if !self.is_owned(id) {
            return false;
        }
        self.completed.insert(id.to_string())
    }

    /// Record that a machine's hint has been disclosed. Returns false if it
    /// was already disclosed.
    pub fn unlock_hint(&mut self, id: &str) -> bool {
        self.unlocked_hints.insert(id.to_string())
    }

    #[must_use]
    pub fn is_owned(&self, id: &str) -> bool {
        self.owned.iter().any(|owned| owned == id)
    }

    #[must_use]
    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    #[must_use]
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    #[must_use]
    pub fn is_hint_unlocked(&self, id: &str) -> bool {
        self.unlocked_hints.contains(id)
    }

    /// Owned ids in acquisition order.
    #[must_use]
    pub fn owned_ids(&self) -> &[String] {
        &self.owned
    }

    #[must_use]
    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Ids whose hints have been disclosed, in no particular order.
    pub fn unlocked_hint_ids(&self) -> impl Iterator<Item = &str> {
        self.unlocked_hints.iter().map(String::as_str)
    }
}
