//! High-level session binding a shared catalog to per-player mutable state.
use std::rc::Rc;

use crate::acquisition;
use crate::catalog::{Card, Catalog};
use crate::clock::ClockController;
use crate::outcome::{AcquisitionOutcome, CardView, SubmitOutcome};
use crate::puzzle::{self, OpenCard};
use crate::state::{Ending, InventoryState};

/// One player's run: inventory, clock, and the transient open-card view.
///
/// The catalog is shared immutably between sessions; everything mutable is
/// constructed fresh per session. All operations are total and atomic with
/// respect to the model; the terminal clock transition is checked after
/// every mutating operation and recorded exactly once.
#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: Rc<Catalog>,
    state: InventoryState,
    clock: ClockController,
    open: Option<OpenCard>,
    ending: Option<Ending>,
}

impl GameSession {
    /// Start a session with the deck's own starting hand and clock.
    #[must_use]
    pub fn new(catalog: Rc<Catalog>) -> Self {
        let seconds = catalog.starting_seconds();
        Self::with_clock(catalog, seconds)
    }

    /// Start a session with an overridden clock.
    #[must_use]
    pub fn with_clock(catalog: Rc<Catalog>, seconds: u32) -> Self {
        let state = InventoryState::with_starting_cards(catalog.starting_cards());
        Self {
            catalog,
            state,
            clock: ClockController::new(seconds),
            open: None,
            ending: None,
        }
    }

    /// Take a card by its typed identifier.
    pub fn take_card(&mut self, input: &str) -> AcquisitionOutcome {
        let outcome =
            acquisition::take_card(&self.catalog, &mut self.state, &mut self.clock, input);
        match &outcome {
            AcquisitionOutcome::Taken { id } => self.record_victory_if_won(id),
            AcquisitionOutcome::TrapTriggered {
                granted: Some(id), ..
            } => self.record_victory_if_won(id),
            _ => {}
        }
        self.check_clock();
        outcome
    }

    /// Open an owned, still-interactive card in the zoom view. Replaces any
    /// previously open card, discarding its wrong-answer tally.
    ///
    /// Returns `None` for unknown, unowned, or completed cards (completed
    /// cards are not re-offered for interaction).
    pub fn open_card(&mut self, id: &str) -> Option<CardView> {
        if !self.state.is_owned(id) || self.state.is_completed(id) {
            return None;
        }
        let card = self.catalog.lookup(id)?;
        // A card flipped in an earlier view opens face up.
        let open = OpenCard::new(id, self.state.is_revealed(id));
        let view = self.view_of(card, &open);
        self.open = Some(open);
        Some(view)
    }

    /// Close the zoom view, discarding the transient tally. Already-applied
    /// penalties and inventory mutations stay.
    pub fn close_card(&mut self) {
        self.open = None;
    }

    /// Flip the currently open card. Returns `None` if `id` is not open.
    pub fn flip_card(&mut self, id: &str) -> Option<CardView> {
        let open = self.open.as_mut().filter(|open| open.id() == id)?;
        open.flip(&mut self.state);
        let card = self.catalog.lookup(id)?;
        Some(self.view_of(card, self.open.as_ref()?))
    }

    /// Submit a code against a machine card.
    ///
    /// A live code entry exists only while the card is open and face up;
    /// outside that, a solved machine still answers `AlreadySolved` so
    /// repeat submissions stay idempotent, and anything else is
    /// `Unavailable`.
    pub fn submit_code(&mut self, id: &str, raw_code: &str) -> SubmitOutcome {
        let outcome = match &mut self.open {
            Some(open) if open.id() == id && open.is_face_up() => puzzle::submit_code(
                &self.catalog,
                &mut self.state,
                &mut self.clock,
                open,
                raw_code,
            ),
            _ => {
                if self.state.is_owned(id)
                    && self.state.is_completed(id)
                    && self.catalog.lookup(id).is_some_and(Card::is_machine)
                {
                    SubmitOutcome::AlreadySolved
                } else {
                    SubmitOutcome::Unavailable { id: id.to_string() }
                }
            }
        };

        if let SubmitOutcome::Solved { granted, .. } = &outcome {
            // The zoom view closes on success.
            self.close_card();
            for id in granted {
                self.record_victory_if_won(id);
            }
        }
        self.check_clock();
        outcome
    }

    /// Advance the countdown by one second. Call once per second while the
    /// session runs. Returns the remaining seconds.
    pub fn tick(&mut self) -> u32 {
        self.clock.tick();
        self.check_clock();
        self.clock.remaining_seconds()
    }

    fn check_clock(&mut self) {
        if self.clock.poll_time_up() && self.ending.is_none() {
            self.ending = Some(Ending::TimeUp);
        }
    }

    fn record_victory_if_won(&mut self, id: &str) {
        if self.ending.is_none() && self.catalog.lookup(id).is_some_and(Card::is_win) {
            self.ending = Some(Ending::Victory);
        }
    }

    fn view_of(&self, card: &Card, open: &OpenCard) -> CardView {
        let face_up = open.is_face_up();
        let can_submit = face_up && card.is_machine() && !self.state.is_completed(&card.id);
        CardView {
            id: card.id.clone(),
            name: card.name.clone(),
            face_up,
            text: face_up.then(|| card.text.clone()).flatten(),
            prompt: can_submit
                .then(|| card.machine().map(|spec| spec.prompt.clone()))
                .flatten(),
            can_submit,
        }
    }

    /// View of the currently open card, if any.
    #[must_use]
    pub fn open_view(&self) -> Option<CardView> {
        let open = self.open.as_ref()?;
        let card = self.catalog.lookup(open.id())?;
        Some(self.view_of(card, open))
    }

    /// Owned ids in acquisition order.
    #[must_use]
    pub fn owned_ids(&self) -> &[String] {
        self.state.owned_ids()
    }

    #[must_use]
    pub fn is_completed(&self, id: &str) -> bool {
        self.state.is_completed(id)
    }

    #[must_use]
    pub fn is_revealed(&self, id: &str) -> bool {
        self.state.is_revealed(id)
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    /// The disclosed hint for a machine card, if it has been unlocked.
    #[must_use]
    pub fn hint_for(&self, id: &str) -> Option<&str> {
        if !self.state.is_hint_unlocked(id) {
            return None;
        }
        self.catalog
            .lookup(id)?
            .machine()?
            .hint
            .as_deref()
    }

    /// Terminal outcome, once one has been reached.
    #[must_use]
    pub const fn ending(&self) -> Option<Ending> {
        self.ending
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Borrow the underlying inventory state.
    #[must_use]
    pub const fn state(&self) -> &InventoryState {
        &self.state
    }

    /// Consume the session, returning the inventory state.
    #[must_use]
    pub fn into_state(self) -> InventoryState {
        self.state
    }
}
