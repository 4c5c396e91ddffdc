// File: src/actions/home_assistant.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::info;

use glowbot_common::traits::executor_traits::{HaAction, HomeAutomation};
use glowbot_common::traits::repository_traits::SecretsRepository;

use crate::Error;

const SERVICE_CALL_TIMEOUT: Duration = Duration::from_secs(10);

// Entity ids as configured on the hub.
const BUBBLE_MACHINE: &str = "button.esphome_web_13e1fc_bubble_burst";
const BIRTHDAY_POPPER: &str = "switch.happpy_bday_celebrate";
const BIRTHDAY_CANDLE: &str = "switch.happpy_bday_blow";
const DESK_STOP: &str = "over.esphome_web_fdf034_desk";
const DESK_HEIGHT: &str = "number.esphome_web_fdf034_desk_height";
const PISTON_UP: &str = "button.piston_go_to_top";
const PISTON_DOWN: &str = "button.piston_move_down";

/// Fires effects through a Home Assistant instance's REST service API.
/// Credentials come from the secret store on every call, so a token or URL
/// change applies without a restart.
pub struct HomeAssistantClient {
    secrets_repo: Arc<dyn SecretsRepository>,
    http: Client,
}

impl HomeAssistantClient {
    pub fn new(secrets_repo: Arc<dyn SecretsRepository>) -> Self {
        Self {
            secrets_repo,
            http: Client::new(),
        }
    }

    /// POSTs one service call, e.g. `button/press` on an entity id.
    async fn call_service(&self, service: &str, data: Value) -> Result<(), Error> {
        let secrets = self.secrets_repo.load_secrets().await?;
        if secrets.ha_access_token.is_empty() || secrets.ha_url.is_empty() {
            return Err(Error::Platform(
                "Home Assistant credentials are missing from the secret store".to_string(),
            ));
        }

        let url = format!("{}/api/services/{}", secrets.ha_url, service);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&secrets.ha_access_token)
            .json(&data)
            .timeout(SERVICE_CALL_TIMEOUT)
            .send()
            .await?;

        if resp.status().is_success() {
            info!("(HomeAssistant) service '{}' called successfully", service);
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(Error::Platform(format!(
                "Home Assistant service '{}' returned {}: {}",
                service, status, body
            )))
        }
    }

    /// The desk firmware sometimes ignores a single request, so the
    /// stop-then-set pair is issued twice with short settling pauses.
    async fn adjust_desk_height(&self, height_cm: f64) -> Result<(), Error> {
        for round in 0..2 {
            if round > 0 {
                sleep(Duration::from_secs(1)).await;
            }
            self.call_service("cover/stop_cover", json!({ "entity_id": DESK_STOP }))
                .await?;
            sleep(Duration::from_secs(1)).await;
            self.call_service(
                "number/set_value",
                json!({ "entity_id": DESK_HEIGHT, "value": height_cm }),
            )
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl HomeAutomation for HomeAssistantClient {
    async fn run(&self, action: HaAction) -> Result<(), Error> {
        match action {
            HaAction::Bubbles => {
                info!("(HomeAssistant) turning on the bubble machine");
                self.call_service("button/press", json!({ "entity_id": BUBBLE_MACHINE }))
                    .await
            }
            HaAction::BirthdayPopper => {
                info!("(HomeAssistant) firing the birthday popper");
                self.call_service("switch/turn_on", json!({ "entity_id": BIRTHDAY_POPPER }))
                    .await
            }
            HaAction::BirthdayCandle => {
                info!("(HomeAssistant) blowing out the birthday candle");
                self.call_service("switch/turn_on", json!({ "entity_id": BIRTHDAY_CANDLE }))
                    .await
            }
            HaAction::DeskHeight(height_cm) => {
                info!("(HomeAssistant) moving desk to {} cm", height_cm);
                self.adjust_desk_height(height_cm).await
            }
            HaAction::PistonUp => {
                info!("(HomeAssistant) moving piston to top");
                self.call_service("button/press", json!({ "entity_id": PISTON_UP }))
                    .await
            }
            HaAction::PistonDown => {
                info!("(HomeAssistant) moving piston to bottom");
                self.call_service("button/press", json!({ "entity_id": PISTON_DOWN }))
                    .await
            }
        }
    }
}
