// File: glowbot-common/src/models/plaque.rs

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A supporter plaque on the physical LED board. Field names mirror the
/// stored JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plaque {
    #[serde(rename = "YT_Name", default)]
    pub yt_name: String,
    #[serde(rename = "twitchusername", default)]
    pub twitch_username: String,
    /// Stored as "#rrggbb".
    #[serde(rename = "Leds_colour", default)]
    pub leds_colour: String,
    /// Comma-separated LED indices, e.g. "86,85,84".
    #[serde(rename = "Leds", default)]
    pub leds: String,
}

impl Plaque {
    /// Case-insensitive match of a chat display name against either of the
    /// plaque's platform names. Empty stored names never match.
    pub fn matches_display_name(&self, display_name: &str) -> bool {
        let lowered = display_name.to_lowercase();
        (!self.yt_name.is_empty() && self.yt_name.to_lowercase() == lowered)
            || (!self.twitch_username.is_empty()
                && self.twitch_username.to_lowercase() == lowered)
    }

    /// The color with the leading '#' stripped, validated as six hex digits.
    pub fn color_hex(&self) -> Result<String, Error> {
        let hex = self.leds_colour.strip_prefix('#').unwrap_or(&self.leds_colour);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Parse(format!(
                "bad plaque color {:?} for {:?}",
                self.leds_colour, self.yt_name
            )));
        }
        Ok(hex.to_string())
    }

    /// The LED index list parsed out of the comma-separated field.
    pub fn led_indices(&self) -> Result<Vec<u16>, Error> {
        self.leds
            .split(',')
            .map(|part| {
                part.trim().parse::<u16>().map_err(|e| {
                    Error::Parse(format!(
                        "bad LED index {:?} for {:?}: {}",
                        part, self.yt_name, e
                    ))
                })
            })
            .collect()
    }
}
