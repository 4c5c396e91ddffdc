// File: glowbot-common/src/traits/executor_traits.rs

use async_trait::async_trait;

use crate::error::Error;
use crate::models::plaque::Plaque;

/// The home-automation effects the command table can reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HaAction {
    Bubbles,
    BirthdayPopper,
    BirthdayCandle,
    /// Move the standing desk to a height in centimeters.
    DeskHeight(f64),
    PistonUp,
    PistonDown,
}

/// Plays a named sound clip. The name is the command suffix, not a path.
#[async_trait]
pub trait SoundPlayer: Send + Sync {
    async fn play(&self, sound_name: &str) -> Result<(), Error>;
}

/// Drives the physical plaque LED board.
#[async_trait]
pub trait LedBoard: Send + Sync {
    /// Lights the plaque's segment in its color, holds for `seconds`, then
    /// turns the segment off again.
    async fn light_plaque(&self, plaque: &Plaque, seconds: u64) -> Result<(), Error>;
}

/// Fires effects through the home-automation hub.
#[async_trait]
pub trait HomeAutomation: Send + Sync {
    async fn run(&self, action: HaAction) -> Result<(), Error>;
}

/// Text-to-speech output.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn say(&self, text: &str) -> Result<(), Error>;
}
