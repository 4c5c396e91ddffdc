//! src/platforms/twitch/auth.rs
//!
//! Twitch OAuth upkeep: a best-effort refresh of the stored access token at
//! session start, plus a login lookup through the validate endpoint so the
//! chat runtime knows its own identity.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, error, info};

use glowbot_common::models::credential::Secrets;
use glowbot_common::traits::repository_traits::SecretsRepository;

use crate::Error;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const VALIDATE_URL: &str = "https://id.twitch.tv/oauth2/validate";

/// A hung id.twitch.tv must not stall startup.
const AUTH_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct TwitchTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
}

/// For /validate
#[derive(Deserialize)]
struct TwitchValidateResponse {
    login: String,
    user_id: String,
}

/// Refreshes the stored access token through the refresh grant and persists
/// the result immediately. Best-effort by contract: every failure path logs
/// and falls back to whatever token is already stored. Returns `None` only
/// when no usable token exists at all.
pub async fn refresh_access_token(secrets_repo: &dyn SecretsRepository) -> Option<String> {
    let mut secrets = match secrets_repo.load_secrets().await {
        Ok(s) => s,
        Err(e) => {
            error!("(TwitchAuth) could not load secrets => {:?}", e);
            return None;
        }
    };

    let request = match secrets.twitch_refresh_request() {
        Some(r) => r,
        None => {
            info!("(TwitchAuth) refresh credentials missing, skipping refresh");
            return stored_token(&secrets);
        }
    };

    let params = [
        ("grant_type", "refresh_token".to_string()),
        ("refresh_token", request.refresh_token),
        ("client_id", request.client_id),
        ("client_secret", request.client_secret),
    ];

    let resp = match ReqwestClient::new()
        .post(TOKEN_URL)
        .form(&params)
        .timeout(AUTH_REQUEST_TIMEOUT)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            error!("(TwitchAuth) refresh request failed => {e}");
            return stored_token(&secrets);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        error!("(TwitchAuth) failed to refresh token: {status} {body}");
        return stored_token(&secrets);
    }

    let token: TwitchTokenResponse = match resp.json().await {
        Ok(t) => t,
        Err(e) => {
            error!("(TwitchAuth) could not parse token response => {e}");
            return stored_token(&secrets);
        }
    };

    info!("(TwitchAuth) token refreshed successfully");
    secrets.twitch_oauth_token = token.access_token.clone();
    if let Some(rotated) = token.refresh_token {
        secrets.twitch_refresh_token = rotated;
    }
    if let Err(e) = secrets_repo.save_secrets(&secrets).await {
        // The new token still works for this session even if the save failed.
        error!("(TwitchAuth) could not persist refreshed token => {:?}", e);
    }

    Some(token.access_token)
}

/// Resolves the account login behind an access token via /validate. The
/// login doubles as the IRC nick and the bot's own-identity filter.
pub async fn fetch_login(access_token: &str) -> Result<String, Error> {
    let bare = access_token.trim_start_matches("oauth:");
    let resp = ReqwestClient::new()
        .get(VALIDATE_URL)
        .header("Authorization", format!("OAuth {bare}"))
        .timeout(AUTH_REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|e| Error::Auth(format!("Error calling /validate: {e}")))?;

    if !resp.status().is_success() {
        return Err(Error::Auth(format!(
            "Failed to validate token: HTTP {}",
            resp.status()
        )));
    }

    let validate: TwitchValidateResponse = resp
        .json()
        .await
        .map_err(|e| Error::Auth(format!("Error parsing /validate response: {e}")))?;

    debug!(
        "(TwitchAuth) /validate returned login={} user_id={}",
        validate.login, validate.user_id
    );
    Ok(validate.login)
}

fn stored_token(secrets: &Secrets) -> Option<String> {
    if secrets.twitch_oauth_token.is_empty() {
        None
    } else {
        Some(secrets.twitch_oauth_token.clone())
    }
}
