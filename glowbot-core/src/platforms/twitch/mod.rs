// File: src/platforms/twitch/mod.rs

pub mod auth;
pub mod client;
pub mod runtime;
