//! Static deck catalog: card definitions, trap codes, and load-time validation.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::constants::DEFAULT_SESSION_SECONDS;

/// Short id lists stored inline without additional allocations.
pub type IdList = SmallVec<[String; 4]>;

/// Puzzle payload carried only by machine cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSpec {
    /// Text shown next to the code entry field.
    pub prompt: String,
    /// Expected code; matched case-insensitively after trimming.
    pub code: String,
    /// Card ids granted on success, in grant order.
    pub rewards: IdList,
    /// Card ids marked completed on success. Defaults to the machine itself.
    #[serde(default)]
    pub completes: Option<IdList>,
    pub success_message: String,
    /// Disclosed after repeated wrong answers.
    #[serde(default)]
    pub hint: Option<String>,
}

/// What a card is. Only `Machine` cards can accept a code submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardKind {
    Info,
    Clue,
    Tool,
    Machine(MachineSpec),
    Win,
}

impl CardKind {
    /// Short label used in displays and reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Clue => "clue",
            Self::Tool => "tool",
            Self::Machine(_) => "machine",
            Self::Win => "win",
        }
    }
}

/// A single card definition. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    /// Narrative payload shown once the card is flipped face up.
    #[serde(default)]
    pub text: Option<String>,
    /// Prerequisite ids; owning any one of them makes this card takeable.
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(flatten)]
    pub kind: CardKind,
}

impl Card {
    /// The machine payload, if this card carries a puzzle.
    #[must_use]
    pub const fn machine(&self) -> Option<&MachineSpec> {
        match &self.kind {
            CardKind::Machine(spec) => Some(spec),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_machine(&self) -> bool {
        matches!(self.kind, CardKind::Machine(_))
    }

    #[must_use]
    pub const fn is_win(&self) -> bool {
        matches!(self.kind, CardKind::Win)
    }
}

/// A known trap code and its time cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapEntry {
    pub minutes: u32,
    pub message: String,
}

/// On-disk deck layout. Converted into a [`Catalog`] after validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DeckFile {
    #[serde(default = "DeckFile::default_starting_seconds")]
    starting_seconds: u32,
    #[serde(default)]
    starting_cards: Vec<String>,
    #[serde(default)]
    cards: Vec<Card>,
    #[serde(default)]
    traps: HashMap<String, TrapEntry>,
}

impl DeckFile {
    const fn default_starting_seconds() -> u32 {
        DEFAULT_SESSION_SECONDS
    }
}

/// Fatal configuration errors detected while loading a deck.
///
/// Any of these aborts startup; gameplay errors are never represented here.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("deck JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate card id `{id}`")]
    DuplicateId { id: String },
    #[error("card `{card}`: {field} references unknown card `{target}`")]
    DanglingReference {
        card: String,
        field: &'static str,
        target: String,
    },
    #[error("machine card `{card}` has an empty expected code")]
    EmptyCode { card: String },
    #[error("machine card `{card}` grants no rewards")]
    NoRewards { card: String },
    #[error("starting hand references unknown card `{target}`")]
    UnknownStartingCard { target: String },
    #[error("starting hand lists card `{id}` twice")]
    DuplicateStartingCard { id: String },
    #[error("deck has a zero-length clock")]
    ZeroClock,
}

/// Validated, read-only deck catalog shared by every session.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    cards: Vec<Card>,
    index: HashMap<String, usize>,
    traps: HashMap<String, TrapEntry>,
    starting_cards: Vec<String>,
    starting_seconds: u32,
}

impl Catalog {
    /// Parse and validate a deck from JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the JSON cannot be parsed or any
    /// cross-reference in the deck is dangling.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: DeckFile = serde_json::from_str(json)?;
        Self::from_deck_file(file)
    }

    /// The embedded standard deck (the professor's study).
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the embedded asset fails validation,
    /// which indicates a packaging defect.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../assets/standard_deck.json"))
    }

    /// An empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            index: HashMap::new(),
            traps: HashMap::new(),
            starting_cards: Vec::new(),
            starting_seconds: DEFAULT_SESSION_SECONDS,
        }
    }

    fn from_deck_file(file: DeckFile) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(file.cards.len());
        for (pos, card) in file.cards.iter().enumerate() {
            if index.insert(card.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: card.id.clone(),
                });
            }
        }

        let catalog = Self {
            cards: file.cards,
            index,
            traps: file.traps,
            starting_cards: file.starting_cards,
            starting_seconds: file.starting_seconds,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every cross-reference in the deck. Called once at load time.
    fn validate(&self) -> Result<(), CatalogError> {
        if self.starting_seconds == 0 {
            return Err(CatalogError::ZeroClock);
        }
        for card in &self.cards {
            for target in &card.requires {
                self.check_reference(card, "requires", target)?;
            }
            if let Some(spec) = card.machine() {
                if spec.code.trim().is_empty() {
                    return Err(CatalogError::EmptyCode {
                        card: card.id.clone(),
                    });
                }
                if spec.rewards.is_empty() {
                    return Err(CatalogError::NoRewards {
                        card: card.id.clone(),
                    });
                }
                for target in &spec.rewards {
                    self.check_reference(card, "rewards", target)?;
                }
                for target in spec.completes.iter().flatten() {
                    self.check_reference(card, "completes", target)?;
                }
            }
        }
        let mut seen = HashSet::new();
        for id in &self.starting_cards {
            if !self.contains(id) {
                return Err(CatalogError::UnknownStartingCard { target: id.clone() });
            }
            if !seen.insert(id.as_str()) {
                return Err(CatalogError::DuplicateStartingCard { id: id.clone() });
            }
        }
        Ok(())
    }

    fn check_reference(
        &self,
        card: &Card,
        field: &'static str,
        target: &str,
    ) -> Result<(), CatalogError> {
        if self.contains(target) {
            Ok(())
        } else {
            Err(CatalogError::DanglingReference {
                card: card.id.clone(),
                field,
                target: target.to_string(),
            })
        }
    }

    /// Look up a card definition by id.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&Card> {
        self.index.get(id).map(|pos| &self.cards[*pos])
    }

    /// Look up a trap entry by the exact submitted code.
    #[must_use]
    pub fn trap(&self, code: &str) -> Option<&TrapEntry> {
        self.traps.get(code)
    }

    /// Whether `id` names a card in this deck.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All card ids, in deck order.
    pub fn card_ids(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|card| card.id.as_str())
    }

    /// All card definitions, in deck order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Ids seeded into a fresh session's inventory.
    #[must_use]
    pub fn starting_cards(&self) -> &[String] {
        &self.starting_cards
    }

    /// Seconds on the clock when a session starts.
    #[must_use]
    pub const fn starting_seconds(&self) -> u32 {
        self.starting_seconds
    }
}
