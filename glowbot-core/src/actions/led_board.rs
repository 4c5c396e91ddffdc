// File: src/actions/led_board.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::debug;

use glowbot_common::models::plaque::Plaque;
use glowbot_common::traits::executor_traits::LedBoard;
use glowbot_common::traits::repository_traits::SecretsRepository;

use crate::Error;

const LED_OFF_HEX: &str = "000000";

/// Drives a WLED strip over its JSON API. The board address comes from the
/// secret store on every call.
pub struct WledBoard {
    secrets_repo: Arc<dyn SecretsRepository>,
    http: Client,
}

impl WledBoard {
    pub fn new(secrets_repo: Arc<dyn SecretsRepository>) -> Self {
        Self {
            secrets_repo,
            http: Client::new(),
        }
    }

    async fn post_state(&self, board_ip: &str, payload: &Value) -> Result<(), Error> {
        let url = format!("{}/json/state", board_ip);
        let resp = self.http.post(&url).json(payload).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::Platform(format!(
                "LED board returned {} for {}",
                resp.status(),
                url
            )))
        }
    }
}

/// WLED per-LED addressing: segment 0 with an `i` array of alternating
/// index and hex color entries.
fn segment_payload(indices: &[u16], color_hex: &str) -> Value {
    let mut entries: Vec<Value> = Vec::with_capacity(indices.len() * 2);
    for index in indices {
        entries.push(json!(index));
        entries.push(json!(color_hex));
    }
    json!({ "seg": { "id": 0, "i": entries } })
}

#[async_trait]
impl LedBoard for WledBoard {
    async fn light_plaque(&self, plaque: &Plaque, seconds: u64) -> Result<(), Error> {
        let secrets = self.secrets_repo.load_secrets().await?;
        if secrets.board_ip.is_empty() {
            return Err(Error::Platform(
                "LED board address is missing from the secret store".to_string(),
            ));
        }

        let indices = plaque.led_indices()?;
        let color = plaque.color_hex()?;
        debug!(
            "(WledBoard) lighting {:?} in #{} for {}s",
            indices, color, seconds
        );

        self.post_state(&secrets.board_ip, &segment_payload(&indices, &color))
            .await?;
        sleep(Duration::from_secs(seconds)).await;
        self.post_state(&secrets.board_ip, &segment_payload(&indices, LED_OFF_HEX))
            .await
    }
}
