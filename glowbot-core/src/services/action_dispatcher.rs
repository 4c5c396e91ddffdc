// File: src/services/action_dispatcher.rs

use std::sync::Arc;

use tracing::{debug, error};

use glowbot_common::models::intent::Intent;
use glowbot_common::traits::executor_traits::{LedBoard, SpeechSynthesizer};
use glowbot_common::traits::repository_traits::PlaqueRepository;

use crate::services::command_service::CommandService;

/// How long a chat-triggered plaque stays lit.
pub const PLAQUE_LIGHT_SECONDS: u64 = 5;

/// Turns routed intents into side effects. Every intent runs in its own
/// spawned task: a slow or failing executor never blocks message ingestion,
/// and a failure in one intent never reaches its siblings. Failures are
/// logged and dropped.
pub struct ActionDispatcher {
    command_service: Arc<CommandService>,
    plaque_repo: Arc<dyn PlaqueRepository>,
    led_board: Arc<dyn LedBoard>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl ActionDispatcher {
    pub fn new(
        command_service: Arc<CommandService>,
        plaque_repo: Arc<dyn PlaqueRepository>,
        led_board: Arc<dyn LedBoard>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            command_service,
            plaque_repo,
            led_board,
            speech,
        }
    }

    /// Starts the side effect for one intent and returns immediately.
    pub fn dispatch(&self, intent: Intent) {
        debug!("(ActionDispatcher) dispatching {}", intent.kind());
        match intent {
            Intent::TriggerPlaque { display_name } => {
                let repo = Arc::clone(&self.plaque_repo);
                let board = Arc::clone(&self.led_board);
                tokio::spawn(async move {
                    // Re-read at fire time: the plaque file may have changed
                    // since routing.
                    match repo.find_plaque(&display_name).await {
                        Ok(Some(plaque)) => {
                            if let Err(e) =
                                board.light_plaque(&plaque, PLAQUE_LIGHT_SECONDS).await
                            {
                                error!(
                                    "(ActionDispatcher) plaque lighting for '{}' failed: {:?}",
                                    display_name, e
                                );
                            }
                        }
                        Ok(None) => {
                            debug!(
                                "(ActionDispatcher) plaque for '{}' no longer present",
                                display_name
                            );
                        }
                        Err(e) => {
                            error!(
                                "(ActionDispatcher) plaque lookup for '{}' failed: {:?}",
                                display_name, e
                            );
                        }
                    }
                });
            }
            Intent::Speak { text } => {
                let speech = Arc::clone(&self.speech);
                tokio::spawn(async move {
                    if let Err(e) = speech.say(&text).await {
                        error!("(ActionDispatcher) speech failed: {:?}", e);
                    }
                });
            }
            Intent::Execute {
                command,
                invoked_by,
                is_superchat,
            } => {
                let service = Arc::clone(&self.command_service);
                tokio::spawn(async move {
                    if let Err(e) = service
                        .execute_command(&command, &invoked_by, is_superchat)
                        .await
                    {
                        error!(
                            "(ActionDispatcher) command '{}' failed: {:?}",
                            command, e
                        );
                    }
                });
            }
        }
    }
}
