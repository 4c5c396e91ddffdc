// File: glowbot-common/src/traits/mod.rs

pub mod executor_traits;
pub mod repository_traits;

pub use executor_traits::{HaAction, HomeAutomation, LedBoard, SoundPlayer, SpeechSynthesizer};
pub use repository_traits::{CommandRepository, PlaqueRepository, SecretsRepository};
