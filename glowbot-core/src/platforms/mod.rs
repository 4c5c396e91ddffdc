// File: src/platforms/mod.rs

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error(String),
}

pub mod manager;
pub mod twitch;
pub mod youtube;
