// File: src/actions/mod.rs

pub mod home_assistant;
pub mod led_board;
pub mod sound;
pub mod speech;

pub use home_assistant::HomeAssistantClient;
pub use led_board::WledBoard;
pub use sound::SoundBoard;
pub use speech::GoogleSpeech;
