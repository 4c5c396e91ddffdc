// File: glowbot-common/src/models/mod.rs
pub mod command;
pub mod credential;
pub mod event;
pub mod intent;
pub mod platform;
pub mod plaque;

pub use command::{AccessLevel, Command, CommandTable};
pub use credential::{ApiKey, KeyHealth, Secrets, TwitchRefreshRequest};
pub use event::ChatEvent;
pub use intent::Intent;
pub use platform::ChatSource;
pub use plaque::Plaque;
