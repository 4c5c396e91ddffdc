//! tests/router_tests.rs
use glowbot_common::models::command::CommandTable;
use glowbot_common::models::event::ChatEvent;
use glowbot_common::models::intent::Intent;
use glowbot_core::services::route_message;

fn table(raw: &str) -> CommandTable {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn substring_match_executes_the_command() {
    let table = table(r#"{"!sound_applause": {"enabled": true}}"#);
    let event = ChatEvent::twitch("Bob", "great !sound_applause moment");

    let intents = route_message(&table, false, &event);

    assert_eq!(
        intents,
        vec![Intent::Execute {
            command: "!sound_applause".to_string(),
            invoked_by: "Bob".to_string(),
            is_superchat: false,
        }]
    );
}

#[test]
fn speech_prefix_bypasses_the_command_table() {
    // "hello" would match as a substring if the scan ran.
    let table = table(r#"{"hello": {"enabled": true}}"#);
    let event = ChatEvent::twitch("Ann", "!dec hello there");

    let intents = route_message(&table, false, &event);

    assert_eq!(
        intents,
        vec![Intent::Speak {
            text: "Ann said: hello there".to_string(),
        }]
    );
}

#[test]
fn bare_speech_prefix_emits_nothing() {
    // Even with no remainder, the prefix still ends routing: no command
    // scan, no fallback speech.
    let table = table(r#"{"dec": {"enabled": true}}"#);
    let event = ChatEvent::twitch("Bob", "!dec");

    let intents = route_message(&table, false, &event);
    assert!(intents.is_empty());
}

#[test]
fn earlier_table_entry_wins_on_double_match() {
    let table = table(r#"{"!b": {"enabled": true}, "!a": {"enabled": true}}"#);
    let event = ChatEvent::twitch("Bob", "!a and !b together");

    let intents = route_message(&table, false, &event);

    assert_eq!(intents.len(), 1);
    match &intents[0] {
        Intent::Execute { command, .. } => assert_eq!(command, "!b"),
        other => panic!("expected Execute, got {:?}", other),
    }
}

#[test]
fn disabled_commands_fall_through_to_speech() {
    let table = table(r#"{"!sound_tada": {"enabled": false}}"#);
    let event = ChatEvent::twitch("Bob", "!sound_tada");

    let intents = route_message(&table, false, &event);

    assert_eq!(
        intents,
        vec![Intent::Speak {
            text: "Bob said: !sound_tada".to_string(),
        }]
    );
}

#[test]
fn matching_is_case_insensitive() {
    let table = table(r#"{"!sound_tada": {"enabled": true}}"#);
    let event = ChatEvent::twitch("Bob", "LOUD !SOUND_TADA");

    let intents = route_message(&table, false, &event);
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].kind(), "execute");
}

#[test]
fn plaque_trigger_rides_along_with_a_command() {
    let table = table(r#"{"!bubbles": {"enabled": true}}"#);
    let event = ChatEvent::youtube("PlaqueHolder", "!bubbles please", "m1", false);

    let intents = route_message(&table, true, &event);

    assert_eq!(intents.len(), 2);
    assert_eq!(
        intents[0],
        Intent::TriggerPlaque {
            display_name: "PlaqueHolder".to_string(),
        }
    );
    assert_eq!(intents[1].kind(), "execute");
}

#[test]
fn plaque_trigger_rides_along_with_direct_speech() {
    let table = CommandTable::default();
    let event = ChatEvent::twitch("PlaqueHolder", "!dec hi");

    let intents = route_message(&table, true, &event);

    assert_eq!(
        intents,
        vec![
            Intent::TriggerPlaque {
                display_name: "PlaqueHolder".to_string(),
            },
            Intent::Speak {
                text: "PlaqueHolder said: hi".to_string(),
            },
        ]
    );
}

#[test]
fn unmatched_text_is_spoken_back_trimmed() {
    let table = CommandTable::default();
    let event = ChatEvent::twitch("Cara", "  good stream  ");

    let intents = route_message(&table, false, &event);

    assert_eq!(
        intents,
        vec![Intent::Speak {
            text: "Cara said: good stream".to_string(),
        }]
    );
}

#[test]
fn superchat_flag_travels_with_the_intent() {
    let table = table(r#"{"!bubbles": {"enabled": true}}"#);
    let event = ChatEvent::youtube("Rich", "!bubbles", "m9", true);

    let intents = route_message(&table, false, &event);

    assert_eq!(
        intents,
        vec![Intent::Execute {
            command: "!bubbles".to_string(),
            invoked_by: "Rich".to_string(),
            is_superchat: true,
        }]
    );
}
