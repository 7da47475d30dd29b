//! The take-card gate: classifies a raw player-typed identifier.
use crate::catalog::Catalog;
use crate::clock::ClockController;
use crate::outcome::AcquisitionOutcome;
use crate::state::InventoryState;

/// Classify a take-card request and apply its side effects.
///
/// Checks run in strict order, first match wins:
/// 1. known trap code (penalty, plus a silent grant when the code doubles
///    as a collectible card),
/// 2. unknown id,
/// 3. already owned,
/// 4. unmet prerequisite,
/// 5. admit.
///
/// Only the trap and admit branches mutate anything; every other branch is
/// a pure rejection. One card per call.
pub fn take_card(
    catalog: &Catalog,
    state: &mut InventoryState,
    clock: &mut ClockController,
    raw_input: &str,
) -> AcquisitionOutcome {
    let input = raw_input.trim();

    if let Some(trap) = catalog.trap(input) {
        clock.apply_penalty(trap.minutes);
        let granted = (catalog.contains(input) && state.own(input)).then(|| input.to_string());
        return AcquisitionOutcome::TrapTriggered {
            code: input.to_string(),
            penalty_minutes: trap.minutes,
            message: trap.message.clone(),
            granted,
        };
    }

    let Some(card) = catalog.lookup(input) else {
        return AcquisitionOutcome::NotFound {
            input: input.to_string(),
        };
    };

    if state.is_owned(input) {
        return AcquisitionOutcome::AlreadyOwned {
            id: input.to_string(),
        };
    }

    if !card.requires.is_empty() && !card.requires.iter().any(|req| state.is_owned(req)) {
        return AcquisitionOutcome::PrerequisiteUnmet {
            id: input.to_string(),
        };
    }

    state.own(input);
    AcquisitionOutcome::Taken {
        id: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "cards": [
                    { "id": "1", "name": "Booklet", "kind": "info" },
                    { "id": "4", "name": "Page", "kind": "clue", "requires": ["31"] },
                    { "id": "31", "name": "Ocean Book", "kind": "clue" },
                    { "id": "44", "name": "Bait", "kind": "clue" }
                ],
                "traps": {
                    "49": { "minutes": 5, "message": "T9 error! (-5 min)" },
                    "44": { "minutes": 5, "message": "Trap card! (-5 min)" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn admits_a_known_card_once() {
        let catalog = catalog();
        let mut state = InventoryState::new();
        let mut clock = ClockController::new(600);

        let first = take_card(&catalog, &mut state, &mut clock, " 1 ");
        assert_eq!(first, AcquisitionOutcome::Taken { id: "1".into() });
        assert!(state.is_owned("1"));

        let second = take_card(&catalog, &mut state, &mut clock, "1");
        assert_eq!(second, AcquisitionOutcome::AlreadyOwned { id: "1".into() });
        assert_eq!(state.owned_count(), 1);
        assert_eq!(clock.remaining_seconds(), 600);
    }

    #[test]
    fn rejects_unknown_ids_without_mutation() {
        let catalog = catalog();
        let mut state = InventoryState::new();
        let mut clock = ClockController::new(600);

        let outcome = take_card(&catalog, &mut state, &mut clock, "999");
        assert_eq!(outcome, AcquisitionOutcome::NotFound { input: "999".into() });
        assert_eq!(state.owned_count(), 0);
        assert_eq!(clock.remaining_seconds(), 600);
    }

    #[test]
    fn enforces_prerequisites_then_admits() {
        let catalog = catalog();
        let mut state = InventoryState::new();
        let mut clock = ClockController::new(600);

        let blocked = take_card(&catalog, &mut state, &mut clock, "4");
        assert_eq!(blocked, AcquisitionOutcome::PrerequisiteUnmet { id: "4".into() });
        assert!(!state.is_owned("4"));

        take_card(&catalog, &mut state, &mut clock, "31");
        let allowed = take_card(&catalog, &mut state, &mut clock, "4");
        assert_eq!(allowed, AcquisitionOutcome::Taken { id: "4".into() });
    }

    #[test]
    fn pure_trap_applies_penalty_only() {
        let catalog = catalog();
        let mut state = InventoryState::new();
        let mut clock = ClockController::new(600);

        let outcome = take_card(&catalog, &mut state, &mut clock, "49");
        assert_eq!(
            outcome,
            AcquisitionOutcome::TrapTriggered {
                code: "49".into(),
                penalty_minutes: 5,
                message: "T9 error! (-5 min)".into(),
                granted: None,
            }
        );
        assert_eq!(clock.remaining_seconds(), 300);
        assert_eq!(state.owned_count(), 0);
    }

    #[test]
    fn trap_that_is_also_a_card_grants_it_silently() {
        let catalog = catalog();
        let mut state = InventoryState::new();
        let mut clock = ClockController::new(600);

        let outcome = take_card(&catalog, &mut state, &mut clock, "44");
        assert_eq!(
            outcome,
            AcquisitionOutcome::TrapTriggered {
                code: "44".into(),
                penalty_minutes: 5,
                message: "Trap card! (-5 min)".into(),
                granted: Some("44".into()),
            }
        );
        assert!(state.is_owned("44"));
        assert!(!state.is_completed("44"));
        assert_eq!(clock.remaining_seconds(), 300);

        // A repeat costs time again but grants nothing new.
        let repeat = take_card(&catalog, &mut state, &mut clock, "44");
        let AcquisitionOutcome::TrapTriggered { granted, .. } = repeat else {
            panic!("expected trap");
        };
        assert_eq!(granted, None);
        assert_eq!(state.owned_count(), 1);
        assert_eq!(clock.remaining_seconds(), 0);
    }
}
