// File: src/platforms/youtube/mod.rs

pub mod api;
pub mod auth;
pub mod poller;
