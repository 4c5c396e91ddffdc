// File: src/services/message_service.rs

use std::sync::Arc;

use tracing::{debug, warn};

use glowbot_common::models::command::CommandTable;
use glowbot_common::models::event::ChatEvent;
use glowbot_common::traits::repository_traits::{CommandRepository, PlaqueRepository};

use crate::eventbus::EventBus;
use crate::services::action_dispatcher::ActionDispatcher;
use crate::services::command_router::route_message;
use crate::Error;

/// Takes normalized chat events from any source, routes them, and hands the
/// resulting intents to the dispatcher. This is the single path every
/// message goes through regardless of platform.
pub struct MessageService {
    command_repo: Arc<dyn CommandRepository>,
    plaque_repo: Arc<dyn PlaqueRepository>,
    dispatcher: Arc<ActionDispatcher>,
    event_bus: Arc<EventBus>,
}

impl MessageService {
    pub fn new(
        command_repo: Arc<dyn CommandRepository>,
        plaque_repo: Arc<dyn PlaqueRepository>,
        dispatcher: Arc<ActionDispatcher>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        debug!("MessageService::new() called");
        Self {
            command_repo,
            plaque_repo,
            dispatcher,
            event_bus,
        }
    }

    /// Processes one incoming chat event:
    ///  1. Drops events with no author or no text.
    ///  2. Publishes the event to the bus for observers.
    ///  3. Re-reads the command table and plaque list.
    ///  4. Routes the event and starts each resulting intent.
    ///
    /// Provider failures degrade instead of erroring: a missing command
    /// table routes as if empty, a failed plaque lookup as if no plaque.
    pub async fn process_chat_event(&self, event: ChatEvent) -> Result<(), Error> {
        debug!(
            "process_chat_event() source={} author='{}'",
            event.source, event.author
        );

        // 1) Nothing to route without an author and text
        if event.author.is_empty() || event.text.is_empty() {
            debug!("(MessageService) dropping event with empty author or text");
            return Ok(());
        }

        // 2) Publish for observers before any routing decision
        self.event_bus.publish_chat(event.clone()).await;

        // 3) Fresh reads, so external edits apply to this very message
        let table = match self.command_repo.load_commands().await {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    "(MessageService) command table unavailable, routing without it: {:?}",
                    e
                );
                CommandTable::default()
            }
        };
        let plaque_matched = match self.plaque_repo.find_plaque(&event.author).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(
                    "(MessageService) plaque lookup failed for '{}': {:?}",
                    event.author, e
                );
                false
            }
        };

        // 4) Route and fire
        for intent in route_message(&table, plaque_matched, &event) {
            self.dispatcher.dispatch(intent);
        }
        Ok(())
    }
}
