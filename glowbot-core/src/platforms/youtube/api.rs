//! src/platforms/youtube/api.rs
//!
//! Thin client for the YouTube Data API v3 calls this bot needs: key
//! probes, live-broadcast discovery, and live chat pages.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Stable public video used for the key verification probe.
const KEY_PROBE_VIDEO_ID: &str = "dQw4w9WgXcQ";

/// Error from a Data API call, carrying what rotation decisions need.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Quota and authorization failures are the ones a different key can fix.
    pub fn is_rotatable(&self) -> bool {
        match self {
            ApiError::Status { status, body } => {
                *status == 403 || *status == 429 || body.to_lowercase().contains("quota")
            }
            ApiError::Transport(_) => false,
        }
    }
}

/// One chat message as this bot cares about it.
#[derive(Debug, Clone)]
pub struct LiveChatItem {
    pub id: String,
    pub author: String,
    pub text: String,
    pub is_super_chat: bool,
}

/// One page of live chat messages.
#[derive(Debug, Clone, Default)]
pub struct ChatPage {
    pub items: Vec<LiveChatItem>,
    pub next_page_token: Option<String>,
}

impl ChatPage {
    fn from_wire(resp: ChatMessagesResponse) -> Self {
        let items = resp
            .items
            .into_iter()
            .map(|item| LiveChatItem {
                id: item.id,
                author: item.author_details.display_name,
                text: item.snippet.display_message,
                is_super_chat: item.snippet.super_chat_details.is_some(),
            })
            .collect();
        Self {
            items,
            next_page_token: resp.next_page_token,
        }
    }
}

// Wire shapes, camelCase as the API returns them.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveStreamingDetails {
    active_live_chat_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatMessagesResponse {
    #[serde(default)]
    items: Vec<ChatMessageItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatMessageItem {
    id: String,
    #[serde(default)]
    snippet: ChatMessageSnippet,
    #[serde(default)]
    author_details: AuthorDetails,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChatMessageSnippet {
    #[serde(default)]
    display_message: String,
    super_chat_details: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AuthorDetails {
    #[serde(default)]
    display_name: String,
}

/// The Data API surface the poller and the orchestrator depend on. A trait
/// so tests can script page sequences without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveChatApi: Send + Sync {
    /// One lightweight read against a fixed reference video.
    async fn verify_key(&self, api_key: &str) -> Result<(), ApiError>;

    /// First broadcast of the given event type ("live" or "upcoming") on a
    /// channel, if any.
    async fn search_live_video(
        &self,
        api_key: &str,
        channel_id: &str,
        event_type: &str,
    ) -> Result<Option<String>, ApiError>;

    /// The active live chat id attached to a video, if any.
    async fn fetch_live_chat_id(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<Option<String>, ApiError>;

    /// One page of chat messages, optionally continuing from a cursor.
    async fn fetch_chat_page(
        &self,
        api_key: &str,
        live_chat_id: &str,
        page_token: Option<String>,
    ) -> Result<ChatPage, ApiError>;
}

#[derive(Clone)]
pub struct YouTubeApiClient {
    http: ReqwestClient,
}

impl YouTubeApiClient {
    pub fn new() -> Self {
        Self {
            http: ReqwestClient::new(),
        }
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{API_BASE}/{path}");
        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

impl Default for YouTubeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveChatApi for YouTubeApiClient {
    async fn verify_key(&self, api_key: &str) -> Result<(), ApiError> {
        let _: VideosResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "id"),
                    ("id", KEY_PROBE_VIDEO_ID),
                    ("maxResults", "1"),
                    ("key", api_key),
                ],
            )
            .await?;
        Ok(())
    }

    async fn search_live_video(
        &self,
        api_key: &str,
        channel_id: &str,
        event_type: &str,
    ) -> Result<Option<String>, ApiError> {
        let resp: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "id"),
                    ("channelId", channel_id),
                    ("eventType", event_type),
                    ("type", "video"),
                    ("maxResults", "1"),
                    ("key", api_key),
                ],
            )
            .await?;
        Ok(resp.items.into_iter().next().and_then(|item| item.id.video_id))
    }

    async fn fetch_live_chat_id(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<Option<String>, ApiError> {
        let resp: VideosResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "liveStreamingDetails"),
                    ("id", video_id),
                    ("key", api_key),
                ],
            )
            .await?;
        Ok(resp
            .items
            .into_iter()
            .next()
            .and_then(|item| item.live_streaming_details)
            .and_then(|details| details.active_live_chat_id))
    }

    async fn fetch_chat_page(
        &self,
        api_key: &str,
        live_chat_id: &str,
        page_token: Option<String>,
    ) -> Result<ChatPage, ApiError> {
        let mut query = vec![
            ("part", "id,snippet,authorDetails"),
            ("liveChatId", live_chat_id),
            ("key", api_key),
        ];
        if let Some(token) = page_token.as_deref() {
            query.push(("pageToken", token));
        }
        let resp: ChatMessagesResponse = self.get_json("liveChatMessages", &query).await?;
        Ok(ChatPage::from_wire(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotatable_classification() {
        let forbidden = ApiError::Status {
            status: 403,
            body: "forbidden".into(),
        };
        assert!(forbidden.is_rotatable());

        let rate_limited = ApiError::Status {
            status: 429,
            body: "slow down".into(),
        };
        assert!(rate_limited.is_rotatable());

        let quota_in_body = ApiError::Status {
            status: 400,
            body: r#"{"error": {"errors": [{"reason": "quotaExceeded"}]}}"#.into(),
        };
        assert!(quota_in_body.is_rotatable());

        let server_error = ApiError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert!(!server_error.is_rotatable());
    }

    #[test]
    fn chat_page_from_wire_maps_fields() {
        let raw = r#"{
            "items": [
                {
                    "id": "m1",
                    "snippet": {"displayMessage": "hello"},
                    "authorDetails": {"displayName": "Ann"}
                },
                {
                    "id": "m2",
                    "snippet": {
                        "displayMessage": "big tip",
                        "superChatDetails": {"amountMicros": "5000000"}
                    },
                    "authorDetails": {"displayName": "Ben"}
                }
            ],
            "nextPageToken": "tok-2"
        }"#;
        let wire: ChatMessagesResponse = serde_json::from_str(raw).unwrap();
        let page = ChatPage::from_wire(wire);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].author, "Ann");
        assert!(!page.items[0].is_super_chat);
        assert!(page.items[1].is_super_chat);
        assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));
    }

    #[test]
    fn chat_page_tolerates_sparse_items() {
        let raw = r#"{"items": [{"id": "m1"}]}"#;
        let wire: ChatMessagesResponse = serde_json::from_str(raw).unwrap();
        let page = ChatPage::from_wire(wire);
        assert_eq!(page.items[0].id, "m1");
        assert!(page.items[0].author.is_empty());
        assert!(page.items[0].text.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
