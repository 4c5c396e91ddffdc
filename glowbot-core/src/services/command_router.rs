// File: src/services/command_router.rs

use glowbot_common::models::command::CommandTable;
use glowbot_common::models::event::ChatEvent;
use glowbot_common::models::intent::Intent;

/// Marker that routes the rest of a message straight to text-to-speech.
pub const SPEECH_PREFIX: &str = "!dec";

/// Decides what a chat message should cause. Pure function: no I/O, no
/// side effects, just `ChatEvent` in and intents out. The caller supplies
/// the current command table and whether the author has a plaque, both
/// re-read from their stores per message.
///
/// Branch order is fixed:
/// 1. plaque match emits `TriggerPlaque`, independently of everything below;
/// 2. a `!dec` prefix turns the remainder into speech and ends routing,
///    even when the remainder is empty;
/// 3. otherwise the first enabled table entry whose name occurs in the
///    lowercased text wins, in table order;
/// 4. otherwise the whole message is read aloud.
pub fn route_message(
    table: &CommandTable,
    plaque_matched: bool,
    event: &ChatEvent,
) -> Vec<Intent> {
    let mut intents = Vec::new();

    let trimmed = event.trimmed_text();
    let lowered = trimmed.to_lowercase();

    if plaque_matched {
        intents.push(Intent::TriggerPlaque {
            display_name: event.author.clone(),
        });
    }

    if lowered.starts_with(SPEECH_PREFIX) {
        // Skip the marker and the single separator character after it,
        // counted in chars so multi-byte text cannot split mid-character.
        let remainder: String = trimmed
            .chars()
            .skip(SPEECH_PREFIX.chars().count() + 1)
            .collect();
        let remainder = remainder.trim();
        if !remainder.is_empty() {
            intents.push(Intent::Speak {
                text: format!("{} said: {}", event.author, remainder),
            });
        }
        return intents;
    }

    for cmd in table.iter() {
        if cmd.enabled && lowered.contains(cmd.name.as_str()) {
            intents.push(Intent::Execute {
                command: cmd.name.clone(),
                invoked_by: event.author.clone(),
                is_superchat: event.is_super_chat,
            });
            return intents;
        }
    }

    intents.push(Intent::Speak {
        text: format!("{} said: {}", event.author, trimmed),
    });
    intents
}
