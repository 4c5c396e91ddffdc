// File: glowbot-common/src/models/credential.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named YouTube Data API key. The name is the secrets-file field it came
/// from, so logs can say which key rotated out without printing the key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ApiKey {
    pub name: String,
    pub key: String,
}

impl ApiKey {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// The secrets file, field names matching the stored JSON. Unknown fields
/// ride along in `extra` and survive a save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(rename = "TWITCH_CLIENT_ID", default)]
    pub twitch_client_id: String,
    #[serde(rename = "TWITCH_CLIENT_SECRET", default)]
    pub twitch_client_secret: String,
    #[serde(rename = "TWITCH_REFRESH_TOKEN", default)]
    pub twitch_refresh_token: String,
    #[serde(rename = "TWITCH_OAUTH_TOKEN", default)]
    pub twitch_oauth_token: String,
    #[serde(rename = "TWITCH_CHANNEL", default)]
    pub twitch_channel: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_key_backup: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub video_id: String,
    /// Home Assistant long-lived token.
    #[serde(rename = "access_token", default)]
    pub ha_access_token: String,
    #[serde(default)]
    pub ha_url: String,
    #[serde(default)]
    pub board_ip: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Secrets {
    /// Configured YouTube keys in primary-then-backup order. Empty fields
    /// do not count as configured.
    pub fn youtube_api_keys(&self) -> Vec<ApiKey> {
        let mut keys = Vec::new();
        if !self.api_key.is_empty() {
            keys.push(ApiKey::new("api_key", self.api_key.clone()));
        }
        if !self.api_key_backup.is_empty() {
            keys.push(ApiKey::new("api_key_backup", self.api_key_backup.clone()));
        }
        keys
    }

    /// Builds the refresh-grant request only when every part is present.
    pub fn twitch_refresh_request(&self) -> Option<TwitchRefreshRequest> {
        if self.twitch_client_id.is_empty()
            || self.twitch_client_secret.is_empty()
            || self.twitch_refresh_token.is_empty()
        {
            return None;
        }
        Some(TwitchRefreshRequest {
            client_id: self.twitch_client_id.clone(),
            client_secret: self.twitch_client_secret.clone(),
            refresh_token: self.twitch_refresh_token.clone(),
        })
    }
}

/// Parameters for the Twitch OAuth refresh grant.
#[derive(Debug, Clone)]
pub struct TwitchRefreshRequest {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Outcome of the startup key verification pass, one entry per configured
/// key in fallback order.
#[derive(Debug, Clone, Default)]
pub struct KeyHealth {
    pub entries: Vec<(String, bool)>,
}

impl KeyHealth {
    pub fn record(&mut self, name: impl Into<String>, ok: bool) {
        self.entries.push((name.into(), ok));
    }

    /// True only when at least one key exists and every key passed.
    pub fn all_ok(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|(_, ok)| *ok)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_fields_are_skipped() {
        let secrets = Secrets {
            api_key: "AIza-primary".into(),
            api_key_backup: "".into(),
            ..Default::default()
        };
        let keys = secrets.youtube_api_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "api_key");
    }

    #[test]
    fn both_keys_in_fallback_order() {
        let secrets = Secrets {
            api_key: "AIza-primary".into(),
            api_key_backup: "AIza-backup".into(),
            ..Default::default()
        };
        let keys = secrets.youtube_api_keys();
        let names: Vec<&str> = keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["api_key", "api_key_backup"]);
    }

    #[test]
    fn refresh_request_needs_all_three_parts() {
        let mut secrets = Secrets {
            twitch_client_id: "cid".into(),
            twitch_client_secret: "csec".into(),
            twitch_refresh_token: "rtok".into(),
            ..Default::default()
        };
        assert!(secrets.twitch_refresh_request().is_some());
        secrets.twitch_refresh_token.clear();
        assert!(secrets.twitch_refresh_request().is_none());
    }

    #[test]
    fn stored_field_names_round_trip() {
        let raw = r#"{
            "TWITCH_OAUTH_TOKEN": "oauth:abc",
            "api_key": "AIza1",
            "access_token": "ha-token",
            "some_future_field": 7
        }"#;
        let secrets: Secrets = serde_json::from_str(raw).unwrap();
        assert_eq!(secrets.twitch_oauth_token, "oauth:abc");
        assert_eq!(secrets.ha_access_token, "ha-token");
        assert_eq!(
            secrets.extra.get("some_future_field").and_then(|v| v.as_i64()),
            Some(7)
        );
        let back = serde_json::to_string(&secrets).unwrap();
        assert!(back.contains("TWITCH_OAUTH_TOKEN"));
        assert!(back.contains("some_future_field"));
    }

    #[test]
    fn key_health_all_ok_requires_nonempty() {
        let mut health = KeyHealth::default();
        assert!(!health.all_ok());
        health.record("api_key", true);
        assert!(health.all_ok());
        health.record("api_key_backup", false);
        assert!(!health.all_ok());
        assert_eq!(health.failed(), vec!["api_key_backup"]);
    }
}
