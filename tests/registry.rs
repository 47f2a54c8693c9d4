// tests/registry.rs

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use edi::command::{Command, CommandRegistry, IdCounter};
use edi::types::{CommandId, CommandState, ExitOutcome, ShellId};

#[test]
fn ids_start_at_one_and_increase() {
    let registry = CommandRegistry::new();
    assert_eq!(registry.next_command_id(), CommandId::new(1));
    assert_eq!(registry.next_command_id(), CommandId::new(2));
    assert_eq!(registry.next_command_id(), CommandId::new(3));
}

#[test]
fn shell_and_command_sequences_are_independent() {
    let registry = CommandRegistry::new();
    assert_eq!(registry.next_command_id(), CommandId::new(1));
    assert_eq!(registry.next_shell_id(), ShellId::new(1));
    assert_eq!(registry.next_command_id(), CommandId::new(2));
    assert_eq!(registry.next_shell_id(), ShellId::new(2));
}

#[test]
fn concurrent_callers_never_share_an_id() {
    let registry = Arc::new(CommandRegistry::new());
    let threads: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..500)
                    .map(|_| registry.next_command_id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for t in threads {
        let ids = t.join().unwrap();
        // Each caller observes its own ids in increasing order.
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert!(seen.insert(id), "id {id} issued twice");
        }
    }
    assert_eq!(seen.len(), 8 * 500);
    assert_eq!(seen.iter().max(), Some(&CommandId::new(4000)));
}

#[test]
fn lifecycle_follows_legal_steps_only() {
    let registry = CommandRegistry::new();
    let id = registry.next_command_id();
    registry.record(Command::pending(
        id,
        ShellId::new(1),
        "echo hi",
        vec!["echo".into(), "hi".into()],
        1,
    ));

    assert_eq!(registry.state(id), Some(CommandState::Pending));
    assert!(!registry.transition(id, CommandState::Completed));
    assert!(registry.transition(id, CommandState::Running));
    assert!(!registry.transition(id, CommandState::Failed));

    let outcome = ExitOutcome {
        code: Some(0),
        success: true,
    };
    assert!(registry.complete(id, outcome));
    assert_eq!(registry.state(id), Some(CommandState::Completed));
    assert_eq!(registry.get(id).and_then(|c| c.exit), Some(outcome));

    // Terminal states stay terminal.
    assert!(!registry.transition(id, CommandState::Running));
}

#[test]
fn unknown_commands_are_not_transitioned() {
    let registry = CommandRegistry::new();
    assert!(!registry.transition(CommandId::new(42), CommandState::Running));
    assert_eq!(registry.state(CommandId::new(42)), None);
}

#[test]
fn commands_are_listed_per_shell_in_creation_order() {
    let registry = CommandRegistry::new();
    let (a, b) = (registry.next_shell_id(), registry.next_shell_id());
    for shell in [a, b, a] {
        let id = registry.next_command_id();
        registry.record(Command::pending(id, shell, "true", vec!["true".into()], 1));
    }

    let ids: Vec<_> = registry.commands_for(a).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![CommandId::new(1), CommandId::new(3)]);
    assert_eq!(registry.len(), 3);
}

proptest! {
    #[test]
    fn counter_is_strictly_increasing(calls in 1usize..200) {
        let counter = IdCounter::new();
        let mut last = counter.last();
        prop_assert_eq!(last, 0);
        for _ in 0..calls {
            let next = counter.next();
            prop_assert_eq!(next, last + 1);
            last = next;
        }
        prop_assert_eq!(counter.last(), calls as u64);
    }
}
