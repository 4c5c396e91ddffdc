//! src/platforms/twitch/runtime.rs

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use glowbot_common::models::event::ChatEvent;

use crate::platforms::ConnectionStatus;
use crate::Error;

use super::client::TwitchIrcClient;

/// Push-delivered chat source. Wraps the IRC client, filters out the bot's
/// own lines, and hands normalized events to whoever drains
/// `next_message_event()`.
pub struct TwitchChatPlatform {
    /// Resolved account login; doubles as the own-identity filter.
    pub nick: Option<String>,
    pub token: Option<String>,
    pub channel: Option<String>,
    pub connection_status: ConnectionStatus,

    pub client: Option<TwitchIrcClient>,

    /// The loop that drains the client's `incoming` channel.
    pub read_loop_handle: Option<JoinHandle<()>>,

    rx: Option<mpsc::Receiver<ChatEvent>>,
    tx: Option<mpsc::Sender<ChatEvent>>,
}

impl TwitchChatPlatform {
    pub fn new() -> Self {
        Self {
            nick: None,
            token: None,
            channel: None,
            connection_status: ConnectionStatus::Disconnected,
            client: None,
            read_loop_handle: None,
            rx: None,
            tx: None,
        }
    }

    pub fn set_credentials(
        &mut self,
        nick: impl Into<String>,
        token: impl Into<String>,
        channel: impl Into<String>,
    ) {
        self.nick = Some(nick.into());
        self.token = Some(token.into());
        self.channel = Some(channel.into());
    }

    /// Consumes one normalized event from the local channel (if any).
    pub async fn next_message_event(&mut self) -> Option<ChatEvent> {
        match &mut self.rx {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    pub async fn connect(&mut self) -> Result<(), Error> {
        if self.client.is_some() {
            info!("(TwitchChatPlatform) connect => already connected");
            return Ok(());
        }

        let nick = match &self.nick {
            Some(n) if !n.is_empty() => n.clone(),
            _ => return Err(Error::Platform("Twitch chat: no nick set".into())),
        };
        let token = match &self.token {
            Some(t) if !t.is_empty() => t.clone(),
            _ => return Err(Error::Platform("Twitch chat: no token set".into())),
        };
        let channel = match &self.channel {
            Some(c) if !c.is_empty() => c.clone(),
            _ => return Err(Error::Platform("Twitch chat: no channel configured".into())),
        };

        let (tx_evt, rx_evt) = mpsc::channel::<ChatEvent>(1000);
        self.tx = Some(tx_evt);
        self.rx = Some(rx_evt);

        let mut client = match TwitchIrcClient::connect(&nick, &token).await {
            Ok(c) => c,
            Err(e) => {
                let msg = format!("Error connecting to Twitch IRC => {e}");
                error!("{}", msg);
                self.connection_status = ConnectionStatus::Error(msg);
                return Err(Error::Platform("Twitch IRC connect failed".into()));
            }
        };
        client.join_channel(&channel);

        let mut irc_incoming = match client.incoming.take() {
            Some(rx) => rx,
            None => {
                return Err(Error::Platform(
                    "No incoming channel in TwitchIrcClient".into(),
                ))
            }
        };
        self.client = Some(client);
        self.connection_status = ConnectionStatus::Connected;

        let own_nick = nick;
        let tx_for_task = match &self.tx {
            Some(tx) => tx.clone(),
            None => return Err(Error::Platform("Twitch chat: event channel missing".into())),
        };

        let handle = tokio::spawn(async move {
            while let Some(msg) = irc_incoming.recv().await {
                if msg.author.is_empty() {
                    debug!("(TwitchChatPlatform) dropping authorless line");
                    continue;
                }
                if msg.author.eq_ignore_ascii_case(&own_nick) {
                    continue;
                }
                let event = ChatEvent::twitch(msg.author, msg.text);
                if tx_for_task.send(event).await.is_err() {
                    break;
                }
            }
            info!("(TwitchChatPlatform) read loop ended.");
        });
        self.read_loop_handle = Some(handle);

        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        if let Some(cli) = self.client.take() {
            cli.shutdown();
        }
        if let Some(h) = self.read_loop_handle.take() {
            h.abort();
        }

        Ok(())
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status.clone()
    }
}

impl Default for TwitchChatPlatform {
    fn default() -> Self {
        Self::new()
    }
}
