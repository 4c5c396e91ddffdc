//! src/platforms/youtube/poller.rs
//!
//! Poll-delivered chat source. One worker per active live chat id walks the
//! liveChatMessages pages, dedups by message id, rotates API keys on quota
//! errors, and hands normalized events to the session channel. Termination
//! is final for a chat id; restart decisions belong to the caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use glowbot_common::models::credential::ApiKey;
use glowbot_common::models::event::ChatEvent;

use super::api::{LiveChatApi, LiveChatItem};

/// Fixed inter-poll interval.
pub const CHAT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Brief pause after switching to another key.
pub const KEY_ROTATE_BACKOFF: Duration = Duration::from_secs(1);

/// Why a poll worker stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEnd {
    /// The server stopped returning a continuation token.
    ChatEnded,
    /// A page request failed with no key left to rotate to.
    Failed(String),
}

impl PollEnd {
    pub fn reason(&self) -> String {
        match self {
            PollEnd::ChatEnded => "chat ended".to_string(),
            PollEnd::Failed(msg) => msg.clone(),
        }
    }
}

/// Pagination and dedup state for one chat id. Private to its worker and
/// never shared across sources or sessions.
struct PollCursor {
    next_page_token: Option<String>,
    seen_message_ids: HashSet<String>,
    key_index: usize,
    first_page_seeded: bool,
}

impl PollCursor {
    fn new() -> Self {
        Self {
            next_page_token: None,
            seen_message_ids: HashSet::new(),
            key_index: 0,
            first_page_seeded: false,
        }
    }

    /// Takes one page of items and returns the events to emit. The very
    /// first page only seeds the dedup set, so a restart never replays the
    /// pre-existing backlog. Items missing an author or text are skipped
    /// individually but still enter the dedup set.
    fn absorb(&mut self, items: Vec<LiveChatItem>) -> Vec<ChatEvent> {
        if !self.first_page_seeded {
            self.first_page_seeded = true;
            for item in &items {
                self.seen_message_ids.insert(item.id.clone());
            }
            debug!(
                "(LiveChatPoller) seeded {} backlog message ids",
                self.seen_message_ids.len()
            );
            return Vec::new();
        }

        let mut events = Vec::new();
        for item in items {
            if !self.seen_message_ids.insert(item.id.clone()) {
                continue;
            }
            if item.author.is_empty() || item.text.is_empty() {
                debug!("(LiveChatPoller) skipping malformed item {}", item.id);
                continue;
            }
            events.push(ChatEvent::youtube(
                item.author,
                item.text,
                item.id,
                item.is_super_chat,
            ));
        }
        events
    }
}

pub struct LiveChatPoller {
    api: Arc<dyn LiveChatApi>,
    keys: Vec<ApiKey>,
    live_chat_id: String,
    cursor: PollCursor,
}

impl LiveChatPoller {
    pub fn new(
        api: Arc<dyn LiveChatApi>,
        keys: Vec<ApiKey>,
        live_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            keys,
            live_chat_id: live_chat_id.into(),
            cursor: PollCursor::new(),
        }
    }

    /// Runs until the chat ends or an unrecoverable error occurs, sending
    /// each new event into `tx` in server-returned order.
    pub async fn run(mut self, tx: mpsc::Sender<ChatEvent>) -> PollEnd {
        if self.keys.is_empty() {
            return PollEnd::Failed("no API keys configured".into());
        }
        info!(
            "(LiveChatPoller) polling live chat {} with {} key(s)",
            self.live_chat_id,
            self.keys.len()
        );

        // Consecutive rotatable failures; a full lap through the keys
        // means every one is quota-dead and the source stops.
        let mut exhausted_keys = 0usize;

        loop {
            let key = &self.keys[self.cursor.key_index];
            let result = self
                .api
                .fetch_chat_page(
                    &key.key,
                    &self.live_chat_id,
                    self.cursor.next_page_token.clone(),
                )
                .await;

            match result {
                Ok(page) => {
                    exhausted_keys = 0;
                    for event in self.cursor.absorb(page.items) {
                        if tx.send(event).await.is_err() {
                            info!("(LiveChatPoller) event receiver dropped, stopping");
                            return PollEnd::Failed("event receiver dropped".into());
                        }
                    }
                    match page.next_page_token {
                        Some(token) => self.cursor.next_page_token = Some(token),
                        None => {
                            info!("(LiveChatPoller) no continuation token, chat ended");
                            return PollEnd::ChatEnded;
                        }
                    }
                    tokio::time::sleep(CHAT_POLL_INTERVAL).await;
                }
                Err(e) if e.is_rotatable() && self.keys.len() > 1 => {
                    exhausted_keys += 1;
                    if exhausted_keys >= self.keys.len() {
                        error!(
                            "(LiveChatPoller) all {} keys hit rotatable errors => {}",
                            self.keys.len(),
                            e
                        );
                        return PollEnd::Failed(format!("all API keys exhausted: {e}"));
                    }
                    let failed = self.keys[self.cursor.key_index].name.clone();
                    self.cursor.key_index = (self.cursor.key_index + 1) % self.keys.len();
                    warn!(
                        "(LiveChatPoller) key '{}' hit a rotatable error, switching to '{}': {}",
                        failed, self.keys[self.cursor.key_index].name, e
                    );
                    tokio::time::sleep(KEY_ROTATE_BACKOFF).await;
                }
                Err(e) => {
                    error!("(LiveChatPoller) page fetch failed => {}", e);
                    return PollEnd::Failed(e.to_string());
                }
            }
        }
    }
}
