// File: src/services/command_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use glowbot_common::models::command::AccessLevel;
use glowbot_common::traits::executor_traits::{HaAction, HomeAutomation, SoundPlayer};
use glowbot_common::traits::repository_traits::CommandRepository;

use crate::Error;

/// Command names that play a sound clip: the suffix after this prefix is
/// the clip name.
pub const SOUND_COMMAND_PREFIX: &str = "!sound_";

/// Standing desk presets in centimeters.
const DESK_UP_HEIGHT_CM: f64 = 120.0;
const DESK_DOWN_HEIGHT_CM: f64 = 70.0;

/// Tracks per-command cooldowns.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_use: DashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and records the use if the command is off cooldown at
    /// `now`. A zero cooldown always acquires.
    pub fn try_acquire(&self, name: &str, cooldown_seconds: u64, now: DateTime<Utc>) -> bool {
        match self.last_use.entry(name.to_string()) {
            Entry::Occupied(mut slot) => {
                let elapsed = now.signed_duration_since(*slot.get()).num_seconds();
                let remain = cooldown_seconds as i64 - elapsed;
                if remain > 0 {
                    return false;
                }
                slot.insert(now);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }
}

/// Resolves what a matched command name actually does and runs it, after
/// enforcing the entry's access level and cooldown.
pub struct CommandService {
    command_repo: Arc<dyn CommandRepository>,
    sound_player: Arc<dyn SoundPlayer>,
    home_automation: Arc<dyn HomeAutomation>,
    cooldowns: CooldownTracker,
}

impl CommandService {
    pub fn new(
        command_repo: Arc<dyn CommandRepository>,
        sound_player: Arc<dyn SoundPlayer>,
        home_automation: Arc<dyn HomeAutomation>,
    ) -> Self {
        debug!("Initializing CommandService");
        Self {
            command_repo,
            sound_player,
            home_automation,
            cooldowns: CooldownTracker::new(),
        }
    }

    /// Runs one command-table entry on behalf of a chat user.
    ///
    /// The table is re-read here so edits made through the external editor
    /// apply to the very next invocation without a restart. Denials (unknown
    /// name, disabled, access, cooldown) are logged and return Ok; only the
    /// executor call itself can propagate an error.
    pub async fn execute_command(
        &self,
        name: &str,
        invoked_by: &str,
        is_superchat: bool,
    ) -> Result<(), Error> {
        // 1) Re-read the table for the current entry state
        let table = self.command_repo.load_commands().await?;
        let cmd = match table.get(name) {
            Some(c) => c,
            None => {
                debug!("(CommandService) '{}' no longer in the table, skipping", name);
                return Ok(());
            }
        };
        if !cmd.enabled {
            debug!("(CommandService) '{}' is disabled, skipping", name);
            return Ok(());
        }

        // 2) Access gate: super chat senders rank above everyone else
        let invoker_rank = if is_superchat {
            AccessLevel::SuperChat.rank()
        } else {
            AccessLevel::Regular.rank()
        };
        if cmd.access_level.rank() > invoker_rank {
            info!(
                "(CommandService) '{}' denied for '{}': requires {:?}",
                cmd.name, invoked_by, cmd.access_level
            );
            return Ok(());
        }

        // 3) Cooldown gate
        let now = Utc::now();
        if !self.cooldowns.try_acquire(&cmd.name, cmd.timeout_seconds, now) {
            debug!("(CommandService) '{}' is on cooldown, skipping", cmd.name);
            return Ok(());
        }

        // 4) The name itself says what to do
        if let Some(sound_name) = cmd.name.strip_prefix(SOUND_COMMAND_PREFIX) {
            info!("(CommandService) playing sound '{}' for '{}'", sound_name, invoked_by);
            return self.sound_player.play(sound_name).await;
        }
        if let Some(action) = builtin_ha_action(&cmd.name) {
            info!("(CommandService) running {:?} for '{}'", action, invoked_by);
            return self.home_automation.run(action).await;
        }

        warn!("(CommandService) '{}' has no mapped effect", cmd.name);
        Ok(())
    }
}

/// Home-automation effects reachable from the command table, by exact
/// command name.
fn builtin_ha_action(name: &str) -> Option<HaAction> {
    match name {
        "!bubbles" => Some(HaAction::Bubbles),
        "!birthday_popper" => Some(HaAction::BirthdayPopper),
        "!birthday_candle" => Some(HaAction::BirthdayCandle),
        "!desk_up" => Some(HaAction::DeskHeight(DESK_UP_HEIGHT_CM)),
        "!desk_down" => Some(HaAction::DeskHeight(DESK_DOWN_HEIGHT_CM)),
        "!piston_up" => Some(HaAction::PistonUp),
        "!piston_down" => Some(HaAction::PistonDown),
        _ => None,
    }
}
