//! src/platforms/youtube/auth.rs
//!
//! Startup key health pass. Every configured key gets one probe; the
//! caller only starts poll ingestion when all of them pass.

use futures_util::future::join_all;
use tracing::{info, warn};

use glowbot_common::models::credential::{ApiKey, KeyHealth};

use super::api::LiveChatApi;

/// Probes all configured keys concurrently against the reference resource.
/// The health mapping is computed once here and never revalidated during
/// the session.
pub async fn verify_keys(api: &dyn LiveChatApi, keys: &[ApiKey]) -> KeyHealth {
    let probes = keys.iter().map(|key| async move {
        match api.verify_key(&key.key).await {
            Ok(()) => {
                info!("(YouTubeAuth) key '{}' verified", key.name);
                (key.name.clone(), true)
            }
            Err(e) => {
                warn!("(YouTubeAuth) key '{}' failed verification => {}", key.name, e);
                (key.name.clone(), false)
            }
        }
    });

    let mut health = KeyHealth::default();
    for (name, ok) in join_all(probes).await {
        health.record(name, ok);
    }
    health
}
