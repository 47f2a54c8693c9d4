// tests/toggle.rs

use edi::document::ToggleController;
use edi::types::{CommandId, Visibility};

#[test]
fn untouched_commands_are_shown() {
    let toggles = ToggleController::new();
    assert_eq!(toggles.visibility(CommandId::new(7)), Visibility::Shown);
}

#[test]
fn toggling_alternates_hidden_and_shown() {
    let mut toggles = ToggleController::new();
    let id = CommandId::new(1);

    for round in 0..10 {
        let expected = if round % 2 == 0 {
            Visibility::Hidden
        } else {
            Visibility::Shown
        };
        assert_eq!(toggles.toggle(id), expected, "round {round}");
        assert_eq!(toggles.visibility(id), expected);
    }
}

#[test]
fn commands_toggle_independently() {
    let mut toggles = ToggleController::new();
    let (a, b) = (CommandId::new(1), CommandId::new(2));

    toggles.toggle(a);
    assert_eq!(toggles.visibility(a), Visibility::Hidden);
    assert_eq!(toggles.visibility(b), Visibility::Shown);
}

#[test]
fn explicit_state_is_the_base_for_the_next_toggle() {
    let mut toggles = ToggleController::new();
    let id = CommandId::new(3);

    toggles.set(id, Visibility::Hidden);
    assert_eq!(toggles.toggle(id), Visibility::Shown);
}
