// File: src/actions/speech.rs

use std::io::Write;
use std::process::Stdio;

use async_trait::async_trait;
use reqwest::Client;
use tokio::process::Command;
use tracing::debug;

use glowbot_common::traits::executor_traits::SpeechSynthesizer;

use crate::Error;

const TTS_URL: &str = "https://translate.google.com/translate_tts";
const TTS_LANGUAGE: &str = "en";

/// Text-to-speech through the public translate endpoint: fetch an mp3 for
/// the text, then pipe it through the same kind of player the sound board
/// uses.
pub struct GoogleSpeech {
    http: Client,
    player_bin: String,
}

impl GoogleSpeech {
    pub fn new(player_bin: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            player_bin: player_bin.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    async fn say(&self, text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Ok(());
        }
        debug!("(GoogleSpeech) speaking: {}", text);

        let resp = self
            .http
            .get(TTS_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", TTS_LANGUAGE),
                ("client", "tw-ob"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let audio = resp.bytes().await?;

        let mut clip = tempfile::Builder::new().suffix(".mp3").tempfile()?;
        clip.write_all(&audio)?;
        clip.flush()?;

        let status = Command::new(&self.player_bin)
            .arg(clip.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Platform(format!(
                "speech player exited with {}",
                status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_text_is_a_no_op() {
        let speech = GoogleSpeech::new("mpg123");
        speech.say("   ").await.unwrap();
    }
}
