// File: src/platforms/manager.rs

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task;
use tracing::{error, info, warn};

use glowbot_common::models::credential::{ApiKey, Secrets};
use glowbot_common::models::event::ChatEvent;
use glowbot_common::models::platform::ChatSource;
use glowbot_common::traits::repository_traits::SecretsRepository;

use crate::eventbus::{BotEvent, EventBus};
use crate::platforms::twitch::auth as twitch_auth;
use crate::platforms::twitch::runtime::TwitchChatPlatform;
use crate::platforms::youtube::api::LiveChatApi;
use crate::platforms::youtube::auth::verify_keys;
use crate::platforms::youtube::poller::LiveChatPoller;
use crate::services::MessageService;
use crate::Error;

/// How long to wait for a manually typed video id before giving up on
/// YouTube chat for this session.
const MANUAL_VIDEO_ID_TIMEOUT: Duration = Duration::from_secs(10);

/// PlatformManager sequences startup (token refresh, key verification,
/// broadcast discovery) and runs each chat source as its own background
/// task, funneling every inbound message into the shared `MessageService`.
///
/// Either source failing to start leaves the other running; partial startup
/// is an accepted outcome, not an error.
pub struct PlatformManager {
    message_svc: Arc<MessageService>,
    secrets_repo: Arc<dyn SecretsRepository>,
    youtube_api: Arc<dyn LiveChatApi>,
    event_bus: Arc<EventBus>,
    /// Skips broadcast discovery entirely when set.
    video_id_override: Option<String>,
}

impl PlatformManager {
    pub fn new(
        message_svc: Arc<MessageService>,
        secrets_repo: Arc<dyn SecretsRepository>,
        youtube_api: Arc<dyn LiveChatApi>,
        event_bus: Arc<EventBus>,
        video_id_override: Option<String>,
    ) -> Self {
        Self {
            message_svc,
            secrets_repo,
            youtube_api,
            event_bus,
            video_id_override,
        }
    }

    /// Refreshes credentials, then starts YouTube polling and the Twitch IRC
    /// runtime in the background. Only a failure to read the secret store is
    /// fatal; everything else degrades to fewer running sources.
    pub async fn start_all_platforms(&self) -> Result<(), Error> {
        let secrets = self.secrets_repo.load_secrets().await?;

        // Best-effort: on refresh failure this falls back to the stored token.
        let twitch_token = twitch_auth::refresh_access_token(self.secrets_repo.as_ref()).await;

        self.start_youtube_ingestion(&secrets).await;

        match twitch_token {
            Some(token) if !secrets.twitch_channel.is_empty() => {
                self.start_twitch_runtime(token, secrets.twitch_channel.clone());
            }
            Some(_) => {
                warn!("[Twitch] no channel configured; skipping Twitch chat");
            }
            None => {
                info!("[Twitch] no token available; skipping Twitch chat");
            }
        }
        Ok(())
    }

    /// Pre-flight and discovery for the poll side. Any missing piece logs
    /// and returns without starting the poller.
    async fn start_youtube_ingestion(&self, secrets: &Secrets) {
        let keys = secrets.youtube_api_keys();
        if keys.is_empty() {
            info!("[YouTube] no API keys configured; skipping YouTube chat");
            return;
        }

        // All-or-nothing gate: one bad key disables YouTube ingestion for
        // the session rather than silently polling with fewer keys.
        let health = verify_keys(self.youtube_api.as_ref(), &keys).await;
        if !health.all_ok() {
            error!(
                "[YouTube] API key verification failed for {:?}; YouTube chat disabled",
                health.failed()
            );
            return;
        }

        let video_id = match discover_video_id(
            self.youtube_api.as_ref(),
            secrets,
            &keys[0].key,
            self.video_id_override.as_deref(),
        )
        .await
        {
            Some(id) => id,
            None => {
                info!("No valid video ID provided; skipping YouTube chat.");
                return;
            }
        };

        let live_chat_id =
            match fetch_live_chat_id_any(self.youtube_api.as_ref(), &keys, &video_id).await {
                Some(id) => id,
                None => {
                    warn!(
                        "[YouTube] live chat not found for video {}; skipping YouTube chat",
                        video_id
                    );
                    return;
                }
            };

        info!(
            "[YouTube] found live chat for video {}; listening for messages",
            video_id
        );
        self.start_youtube_runtime(live_chat_id, keys);
    }

    fn start_youtube_runtime(&self, live_chat_id: String, keys: Vec<ApiKey>) {
        let (tx, mut rx) = mpsc::channel::<ChatEvent>(1000);

        let poller = LiveChatPoller::new(Arc::clone(&self.youtube_api), keys, live_chat_id);
        let event_bus = Arc::clone(&self.event_bus);
        tokio::spawn(async move {
            let end = poller.run(tx).await;
            info!("[YouTube] polling stopped: {}", end.reason());
            event_bus
                .publish(BotEvent::SourceStopped {
                    source: ChatSource::YouTube,
                    reason: end.reason(),
                })
                .await;
        });

        let message_svc = Arc::clone(&self.message_svc);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = message_svc.process_chat_event(event).await {
                    error!("[YouTube] process_chat_event failed: {:?}", e);
                }
            }
            info!("[YouTube] Runtime ended.");
        });
    }

    fn start_twitch_runtime(&self, token: String, channel: String) {
        let message_svc = Arc::clone(&self.message_svc);
        let event_bus = Arc::clone(&self.event_bus);

        tokio::spawn(async move {
            // The IRC login is derived from the token, same as the channel
            // join below; neither is stored separately.
            let login = match twitch_auth::fetch_login(&token).await {
                Ok(l) => l,
                Err(e) => {
                    error!("[Twitch] could not resolve bot login: {:?}", e);
                    return;
                }
            };

            let mut platform = TwitchChatPlatform::new();
            platform.set_credentials(login, token, channel.as_str());
            if let Err(err) = platform.connect().await {
                error!("[Twitch] connect error: {:?}", err);
                return;
            }
            info!("[Twitch] Connected. Joined '{}'", channel);

            while let Some(event) = platform.next_message_event().await {
                if let Err(e) = message_svc.process_chat_event(event).await {
                    error!("[Twitch] process_chat_event failed: {:?}", e);
                }
            }

            info!("[Twitch] Runtime ended.");
            event_bus
                .publish(BotEvent::SourceStopped {
                    source: ChatSource::Twitch,
                    reason: "irc stream closed".to_string(),
                })
                .await;
        });
    }
}

/// Finds the video to poll: an explicit override, then the stored id, then
/// an active live broadcast, then the next upcoming one, then a manual
/// prompt with a timeout.
async fn discover_video_id(
    api: &dyn LiveChatApi,
    secrets: &Secrets,
    primary_key: &str,
    video_id_override: Option<&str>,
) -> Option<String> {
    if let Some(id) = video_id_override {
        info!("[YouTube] using video id override: {}", id);
        return Some(id.to_string());
    }
    if !secrets.video_id.is_empty() {
        info!("[YouTube] using stored video id: {}", secrets.video_id);
        return Some(secrets.video_id.clone());
    }

    if secrets.channel_id.is_empty() {
        warn!("[YouTube] no channel id configured; cannot search for a broadcast");
    } else {
        for event_type in ["live", "upcoming"] {
            match api
                .search_live_video(primary_key, &secrets.channel_id, event_type)
                .await
            {
                Ok(Some(id)) => {
                    info!("[YouTube] found {} broadcast: {}", event_type, id);
                    return Some(id);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("[YouTube] {} broadcast search failed: {:?}", event_type, e);
                }
            }
        }
    }

    info!("No active live stream found.");
    prompt_video_id().await
}

/// Tries each key in order until one yields the chat id.
async fn fetch_live_chat_id_any(
    api: &dyn LiveChatApi,
    keys: &[ApiKey],
    video_id: &str,
) -> Option<String> {
    for key in keys {
        match api.fetch_live_chat_id(&key.key, video_id).await {
            Ok(Some(id)) => return Some(id),
            Ok(None) => {
                warn!("[YouTube] {}: video {} has no active chat", key.name, video_id);
            }
            Err(e) => {
                warn!("[YouTube] {}: chat id lookup failed: {:?}", key.name, e);
            }
        }
    }
    None
}

/// Reads a video id from stdin, giving up after a fixed timeout. On timeout
/// the blocking read is abandoned, not cancelled; the process is expected to
/// outlive it.
async fn prompt_video_id() -> Option<String> {
    let read = task::spawn_blocking(|| {
        print!("Please enter a video ID manually: ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    });

    match tokio::time::timeout(MANUAL_VIDEO_ID_TIMEOUT, read).await {
        Ok(Ok(Some(id))) if !id.is_empty() => Some(id),
        Ok(_) => None,
        Err(_) => {
            info!("Timeout reached. Continuing...");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::youtube::api::{ApiError, MockLiveChatApi};

    fn secrets_with(channel_id: &str, video_id: &str) -> Secrets {
        Secrets {
            channel_id: channel_id.to_string(),
            video_id: video_id.to_string(),
            ..Secrets::default()
        }
    }

    #[tokio::test]
    async fn override_wins_over_everything() {
        let api = MockLiveChatApi::new();
        let secrets = secrets_with("UC123", "stored");
        let found = discover_video_id(&api, &secrets, "AIza0", Some("forced")).await;
        assert_eq!(found.as_deref(), Some("forced"));
    }

    #[tokio::test]
    async fn stored_video_id_skips_search() {
        let api = MockLiveChatApi::new();
        let secrets = secrets_with("UC123", "stored");
        let found = discover_video_id(&api, &secrets, "AIza0", None).await;
        assert_eq!(found.as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn falls_back_to_upcoming_broadcast() {
        let mut api = MockLiveChatApi::new();
        api.expect_search_live_video()
            .withf(|_, _, event_type| event_type == "live")
            .returning(|_, _, _| Ok(None));
        api.expect_search_live_video()
            .withf(|_, _, event_type| event_type == "upcoming")
            .returning(|_, _, _| Ok(Some("up1".to_string())));

        let secrets = secrets_with("UC123", "");
        let found = discover_video_id(&api, &secrets, "AIza0", None).await;
        assert_eq!(found.as_deref(), Some("up1"));
    }

    #[tokio::test]
    async fn chat_id_lookup_tries_keys_in_order() {
        let mut api = MockLiveChatApi::new();
        api.expect_fetch_live_chat_id()
            .withf(|key, _| key == "AIza0")
            .returning(|_, _| Ok(None));
        api.expect_fetch_live_chat_id()
            .withf(|key, _| key == "AIza1")
            .returning(|_, _| Ok(Some("chat9".to_string())));

        let keys = vec![
            ApiKey {
                name: "api_key".to_string(),
                key: "AIza0".to_string(),
            },
            ApiKey {
                name: "api_key_backup".to_string(),
                key: "AIza1".to_string(),
            },
        ];
        let found = fetch_live_chat_id_any(&api, &keys, "vid1").await;
        assert_eq!(found.as_deref(), Some("chat9"));
    }

    #[tokio::test]
    async fn chat_id_lookup_gives_none_when_all_keys_fail() {
        let mut api = MockLiveChatApi::new();
        api.expect_fetch_live_chat_id().returning(|_, _| {
            Err(ApiError::Status {
                status: 403,
                body: "quota".to_string(),
            })
        });

        let keys = vec![ApiKey {
            name: "api_key".to_string(),
            key: "AIza0".to_string(),
        }];
        let found = fetch_live_chat_id_any(&api, &keys, "vid1").await;
        assert_eq!(found, None);
    }
}
