//! Cross-operation invariant sweeps over a scripted session.
use std::rc::Rc;

use decklock_game::{Catalog, Ending, GameSession};

fn catalog() -> Rc<Catalog> {
    Rc::new(
        Catalog::from_json(
            r#"{
                "starting_seconds": 1200,
                "starting_cards": ["1"],
                "cards": [
                    { "id": "1", "name": "Booklet", "kind": "info" },
                    { "id": "37", "name": "Door", "kind": "machine",
                      "prompt": "Code?", "code": "OPEN",
                      "rewards": ["16"], "success_message": "Open!",
                      "hint": "Try the obvious." },
                    { "id": "16", "name": "Desk", "kind": "info" },
                    { "id": "4", "name": "Page", "kind": "clue", "requires": ["16"] },
                    { "id": "44", "name": "Bait", "kind": "clue" },
                    { "id": "22", "name": "Victory", "kind": "win" }
                ],
                "traps": {
                    "44": { "minutes": 5, "message": "Trap card! (-5 min)" },
                    "93": { "minutes": 5, "message": "Dead end... (-5 min)" }
                }
            }"#,
        )
        .expect("fixture deck"),
    )
}

fn assert_lifecycle_subsets(session: &GameSession) {
    for card in session.catalog().cards() {
        if session.is_revealed(&card.id) || session.is_completed(&card.id) {
            assert!(
                session.owned_ids().iter().any(|owned| *owned == card.id),
                "card {} left the owned set behind",
                card.id
            );
        }
    }
}

#[test]
fn lifecycle_subsets_hold_after_every_operation() {
    let mut session = GameSession::new(catalog());
    let steps: &[&dyn Fn(&mut GameSession)] = &[
        &|s| {
            s.take_card("37");
        },
        &|s| {
            s.take_card("unknown");
        },
        &|s| {
            s.open_card("37");
        },
        &|s| {
            s.flip_card("37");
        },
        &|s| {
            s.submit_code("37", "wrong");
        },
        &|s| {
            s.submit_code("37", "93");
        },
        &|s| {
            s.take_card("44");
        },
        &|s| {
            s.submit_code("37", "open");
        },
        &|s| {
            s.take_card("4");
        },
        &|s| {
            s.tick();
        },
    ];

    let mut owned_sizes = Vec::new();
    for step in steps {
        step(&mut session);
        assert_lifecycle_subsets(&session);
        owned_sizes.push(session.owned_ids().len());
    }

    // The collection only ever grows.
    assert!(owned_sizes.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn clock_never_goes_negative_under_heavy_penalties() {
    let mut session = GameSession::new(catalog());

    // 1200 seconds on the clock; three traps cost 900, then keep going.
    for _ in 0..5 {
        session.take_card("93");
    }
    assert_eq!(session.remaining_seconds(), 0);
    assert_eq!(session.ending(), Some(Ending::TimeUp));

    // Post-terminal operations stay total and keep the clamp.
    session.tick();
    session.take_card("93");
    assert_eq!(session.remaining_seconds(), 0);
    assert_eq!(session.ending(), Some(Ending::TimeUp));
}

#[test]
fn trap_that_is_a_card_joins_inventory_uncompleted() {
    let mut session = GameSession::new(catalog());

    session.take_card("44");
    assert!(session.owned_ids().iter().any(|id| id == "44"));
    assert!(!session.is_completed("44"));
    assert!(!session.is_revealed("44"));
    assert_eq!(session.remaining_seconds(), 1_200 - 300);
    assert_lifecycle_subsets(&session);
}

#[test]
fn time_up_wins_over_a_later_victory() {
    let mut session = GameSession::new(catalog());
    for _ in 0..4 {
        session.take_card("93");
    }
    assert_eq!(session.ending(), Some(Ending::TimeUp));

    // A win card granted afterwards does not rewrite history.
    session.take_card("22");
    assert_eq!(session.ending(), Some(Ending::TimeUp));
}
