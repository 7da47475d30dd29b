//! Decklock Game Engine
//!
//! Platform-agnostic core logic for the Decklock escape-room card game.
//! This crate provides the card/inventory state machine and puzzle
//! resolution rules without UI or platform-specific dependencies.

pub mod acquisition;
pub mod catalog;
pub mod clock;
pub mod constants;
pub mod outcome;
pub mod puzzle;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use acquisition::take_card;
pub use catalog::{Card, CardKind, Catalog, CatalogError, IdList, MachineSpec, TrapEntry};
pub use clock::{ClockController, format_clock};
pub use outcome::{AcquisitionOutcome, CardView, Notice, Severity, SubmitOutcome};
pub use puzzle::{ErrorTally, OpenCard, submit_code};
pub use session::GameSession;
pub use state::{Ending, InventoryState};

use std::rc::Rc;

/// Trait for abstracting deck loading operations.
/// Platform-specific implementations should provide this.
pub trait DeckLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the deck catalog from the platform-specific
    /// source.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded or fails validation.
    fn load_deck(&self) -> Result<Catalog, Self::Error>;
}

/// Loader for the embedded standard deck.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDeckLoader;

impl DeckLoader for StandardDeckLoader {
    type Error = CatalogError;

    fn load_deck(&self) -> Result<Catalog, Self::Error> {
        Catalog::standard()
    }
}

/// Main engine for constructing game sessions from a deck source.
pub struct GameEngine<L>
where
    L: DeckLoader,
{
    loader: L,
}

impl<L> GameEngine<L>
where
    L: DeckLoader,
{
    /// Create a new engine with the provided deck loader.
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Load the deck once and hand back the shared catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded.
    pub fn load_catalog(&self) -> Result<Rc<Catalog>, L::Error> {
        self.loader.load_deck().map(Rc::new)
    }

    /// Construct a fresh session over a newly loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be loaded.
    pub fn create_session(&self) -> Result<GameSession, L::Error> {
        Ok(GameSession::new(self.load_catalog()?))
    }
}
