// File: glowbot-common/src/models/platform.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Where a chat message came from. Twitch chat arrives by push over IRC;
/// YouTube live chat is fetched by polling the Data API.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    Twitch,
    YouTube,
}

impl fmt::Display for ChatSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatSource::Twitch => write!(f, "twitch"),
            ChatSource::YouTube => write!(f, "youtube"),
        }
    }
}

impl FromStr for ChatSource {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitch" => Ok(ChatSource::Twitch),
            "youtube" => Ok(ChatSource::YouTube),
            _ => Err(format!("Unknown chat source: {}", s)),
        }
    }
}
