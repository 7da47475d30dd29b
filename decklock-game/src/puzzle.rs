//! Puzzle resolution: flip bookkeeping, code classification, and the
//! per-view wrong-answer tally.
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, IdList};
use crate::clock::ClockController;
use crate::constants::{HINT_UNLOCK_THRESHOLD, WRONG_CODE_PENALTY_MINUTES};
use crate::outcome::SubmitOutcome;
use crate::state::InventoryState;

/// Wrong-answer counter scoped to one open puzzle view.
///
/// Discarded together with the view; never persisted in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTally {
    card_id: String,
    wrong_attempts: u32,
}

impl ErrorTally {
    #[must_use]
    pub fn new(card_id: &str) -> Self {
        Self {
            card_id: card_id.to_string(),
            wrong_attempts: 0,
        }
    }

    #[must_use]
    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    pub const fn reset(&mut self) {
        self.wrong_attempts = 0;
    }

    /// Record one more wrong answer and return the new count.
    pub const fn increment(&mut self) -> u32 {
        self.wrong_attempts += 1;
        self.wrong_attempts
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.wrong_attempts
    }
}

/// Transient state of the card currently shown in the zoom view.
///
/// Face orientation is presentation state; the durable `revealed` flag
/// lives in [`InventoryState`] and is only ever set on the face-down to
/// face-up transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCard {
    id: String,
    face_up: bool,
    tally: ErrorTally,
}

impl OpenCard {
    #[must_use]
    pub fn new(id: &str, face_up: bool) -> Self {
        Self {
            id: id.to_string(),
            face_up,
            tally: ErrorTally::new(id),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn is_face_up(&self) -> bool {
        self.face_up
    }

    #[must_use]
    pub const fn tally(&self) -> &ErrorTally {
        &self.tally
    }

    pub(crate) const fn tally_mut(&mut self) -> &mut ErrorTally {
        &mut self.tally
    }

    /// Flip the card over. The first transition to face up marks the card
    /// revealed for the rest of the session.
    pub fn flip(&mut self, state: &mut InventoryState) {
        self.face_up = !self.face_up;
        if self.face_up {
            state.reveal(&self.id);
        }
    }
}

/// Normalization applied to both the submission and the expected code.
fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Classify a code submission against the open card's machine and apply
/// its side effects.
///
/// Classification order, first match wins: correct (or duplicate correct),
/// known trap, generic wrong. Traps never touch the tally; only generic
/// wrong answers escalate toward hint disclosure.
pub fn submit_code(
    catalog: &Catalog,
    state: &mut InventoryState,
    clock: &mut ClockController,
    open: &mut OpenCard,
    raw_code: &str,
) -> SubmitOutcome {
    let id = open.id().to_string();
    let unavailable = || SubmitOutcome::Unavailable { id: id.clone() };

    let Some(card) = catalog.lookup(&id) else {
        return unavailable();
    };
    let Some(spec) = card.machine() else {
        return unavailable();
    };
    if !state.is_owned(&id) {
        return unavailable();
    }
    // A completed machine accepts no new submissions; repeats answer as
    // duplicates rather than costing time.
    if state.is_completed(&id) {
        return SubmitOutcome::AlreadySolved;
    }

    let submission = normalize(raw_code);

    if submission == normalize(&spec.code) {
        // The first reward doubles as the solved marker: if it is already
        // owned, this is a repeat submission, not a fresh success.
        if state.is_owned(&spec.rewards[0]) {
            return SubmitOutcome::AlreadySolved;
        }

        let mut granted = IdList::new();
        for reward in &spec.rewards {
            if state.own(reward) {
                granted.push(reward.clone());
            }
        }
        match &spec.completes {
            Some(linked) => {
                for linked_id in linked {
                    state.complete(linked_id);
                }
            }
            None => {
                state.complete(&id);
            }
        }
        open.tally_mut().reset();
        return SubmitOutcome::Solved {
            granted,
            message: spec.success_message.clone(),
        };
    }

    if let Some(trap) = catalog.trap(&submission) {
        clock.apply_penalty(trap.minutes);
        return SubmitOutcome::TrapTriggered {
            penalty_minutes: trap.minutes,
            message: trap.message.clone(),
        };
    }

    clock.apply_penalty(WRONG_CODE_PENALTY_MINUTES);
    let attempts = open.tally_mut().increment();
    let hint_unlocked =
        attempts >= HINT_UNLOCK_THRESHOLD && spec.hint.is_some() && state.unlock_hint(&id);
    SubmitOutcome::WrongCode {
        attempts,
        hint_unlocked,
    }
}
