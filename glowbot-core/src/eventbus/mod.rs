//! src/eventbus/mod.rs
//!
//! Provides an in-process event bus that supports guaranteed delivery
//! to multiple subscribers via bounded MPSC queues.

use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

use glowbot_common::models::event::ChatEvent;
use glowbot_common::models::platform::ChatSource;

/// Global event type that various parts of the bot can publish or subscribe to.
#[derive(Debug, Clone)]
pub enum BotEvent {
    /// A normalized chat message from either platform source.
    ChatMessage(ChatEvent),

    /// One-line status notice, e.g. "youtube poller terminated".
    SystemMessage(String),

    /// A chat source stopped and will not produce further messages.
    SourceStopped { source: ChatSource, reason: String },
}

impl BotEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            BotEvent::ChatMessage(_) => "chat_message",
            BotEvent::SystemMessage(_) => "system_message",
            BotEvent::SourceStopped { .. } => "source_stopped",
        }
    }
}

/// Each subscriber gets its own `mpsc::Sender<BotEvent>` for guaranteed delivery.
///
/// - If the subscriber's channel buffer fills, `publish` will await
///   until there's space (backpressure).
/// - If the subscriber has dropped the `Receiver`, the channel is closed
///   and sending returns an error.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<BotEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Default size for each subscriber's buffer.
const DEFAULT_BUFFER_SIZE: usize = 10000;

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<BotEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: BotEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }

    /// Convenience method: publish a `ChatMessage` event.
    pub async fn publish_chat(&self, event: ChatEvent) {
        self.publish(BotEvent::ChatMessage(event)).await;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Duration};

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();

        let mut rx1 = bus.subscribe(Some(5)).await;
        let mut rx2 = bus.subscribe(Some(5)).await;

        bus.publish_chat(ChatEvent::twitch("viewer", "hello")).await;

        let evt1 = rx1.recv().await.expect("rx1 should get event");
        let evt2 = rx2.recv().await.expect("rx2 should get event");

        for evt in [evt1, evt2] {
            match evt {
                BotEvent::ChatMessage(ev) => assert_eq!(ev.author, "viewer"),
                _ => panic!("got the wrong event type"),
            }
        }
    }

    #[tokio::test]
    async fn test_backpressure_blocking() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Some(1)).await; // queue size = 1

        // Publish first message to fill the queue.
        bus.publish(BotEvent::SystemMessage("msg1".into())).await;

        // Spawn a task that reads the two messages after a short delay.
        let handle = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            let first = rx.recv().await.expect("expected first message");
            let second = rx.recv().await.expect("expected second message");
            (first, second)
        });

        // Publish the second message (this call will wait until there's space).
        let second_publish = bus.publish(BotEvent::SystemMessage("msg2".into()));
        let result = timeout(Duration::from_millis(500), second_publish).await;
        assert!(result.is_ok(), "publish should eventually unblock");

        let (evt1, evt2) = handle.await.unwrap();
        if let BotEvent::SystemMessage(txt) = evt1 {
            assert_eq!(txt, "msg1");
        } else {
            panic!("first message mismatch");
        }
        if let BotEvent::SystemMessage(txt) = evt2 {
            assert_eq!(txt, "msg2");
        } else {
            panic!("second message mismatch");
        }
    }

    #[tokio::test]
    async fn test_shutdown_flag_is_visible_to_clones() {
        let bus = EventBus::new();
        let clone = bus.clone();
        assert!(!clone.is_shutdown());
        bus.shutdown();
        assert!(clone.is_shutdown());
    }
}
